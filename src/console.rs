use crossterm::{cursor, queue, style::Print, terminal::{self, ClearType}};
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

/// The terminal operations the countdown needs.
pub trait Console {
    fn hide_cursor(&mut self) -> io::Result<()>;
    fn show_cursor(&mut self) -> io::Result<()>;
    fn clear(&mut self) -> io::Result<()>;
    fn move_to(&mut self, col: u16, row: u16) -> io::Result<()>;
    fn print(&mut self, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;

    /// Writes `lines` on consecutive rows starting at `top`, column 0.
    fn draw_lines(&mut self, top: u16, lines: &[String]) -> io::Result<()> {
        for (row, line) in (top..).zip(lines) {
            self.move_to(0, row)?;
            self.print(line)?;
        }
        self.flush()
    }
}

/// A [`Console`] speaking crossterm escape sequences to any writer.
pub struct Terminal<W: Write> {
    out: W,
}

impl Terminal<io::Stdout> {
    pub fn stdout() -> Self {
        Terminal { out: io::stdout() }
    }
}

impl<W: Write> Terminal<W> {
    #[cfg(test)]
    pub fn new(out: W) -> Self {
        Terminal { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Console for Terminal<W> {
    fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Hide)
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Show)
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    fn move_to(&mut self, col: u16, row: u16) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(col, row))
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Keeps the cursor hidden for as long as it lives and shows it again on drop,
/// including when the owning future is dropped mid-run.
pub struct HiddenCursor<'a, C: Console> {
    console: &'a mut C,
}

impl<'a, C: Console> HiddenCursor<'a, C> {
    pub fn new(console: &'a mut C) -> io::Result<Self> {
        console.hide_cursor()?;
        console.flush()?;
        Ok(HiddenCursor { console })
    }
}

impl<C: Console> Drop for HiddenCursor<'_, C> {
    fn drop(&mut self) {
        let _ = self.console.show_cursor();
        let _ = self.console.flush();
    }
}

impl<C: Console> Deref for HiddenCursor<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.console
    }
}

impl<C: Console> DerefMut for HiddenCursor<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.console
    }
}

#[cfg(test)]
pub mod testing {
    use super::Console;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        HideCursor,
        ShowCursor,
        Clear,
        MoveTo(u16, u16),
        Print(String),
        Flush,
    }

    /// Records every call; clones share one log.
    #[derive(Clone, Default)]
    pub struct RecordingConsole {
        pub ops: Rc<RefCell<Vec<Op>>>,
    }

    impl RecordingConsole {
        pub fn take(&self) -> Vec<Op> {
            std::mem::take(&mut *self.ops.borrow_mut())
        }

        fn push(&mut self, op: Op) -> io::Result<()> {
            self.ops.borrow_mut().push(op);
            Ok(())
        }
    }

    impl Console for RecordingConsole {
        fn hide_cursor(&mut self) -> io::Result<()> {
            self.push(Op::HideCursor)
        }

        fn show_cursor(&mut self) -> io::Result<()> {
            self.push(Op::ShowCursor)
        }

        fn clear(&mut self) -> io::Result<()> {
            self.push(Op::Clear)
        }

        fn move_to(&mut self, col: u16, row: u16) -> io::Result<()> {
            self.push(Op::MoveTo(col, row))
        }

        fn print(&mut self, text: &str) -> io::Result<()> {
            self.push(Op::Print(text.to_string()))
        }

        fn flush(&mut self) -> io::Result<()> {
            self.push(Op::Flush)
        }
    }
}
