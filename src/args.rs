//! Works out the effective command line before flag parsing.

use tracing::{debug, warn};

use crate::config::Config;

/// Returns the arguments to parse, or `None` when help should be shown instead.
///
/// An empty command line expands to the configured default command. A lone
/// time with no flags gets the configured time-only flags appended.
pub fn resolve(raw: &[String], config: &Config) -> Option<Vec<String>> {
    if raw.is_empty() {
        let command = config.no_args_default_command.trim();
        if !config.enable_no_args_default || command == "help" {
            return None;
        }
        return match shlex::split(command) {
            Some(args) if !args.is_empty() => {
                debug!(?args, "using no-args default command");
                Some(args)
            }
            Some(_) => None,
            None => {
                warn!(command, "invalid quoting in no_args_default_command");
                None
            }
        };
    }

    let (flags, bare): (Vec<&String>, Vec<&String>) = raw.iter().partition(|a| a.starts_with('-'));
    let mut args = raw.to_vec();
    if bare.len() == 1 && flags.is_empty() && config.enable_time_only_defaults {
        debug!(flags = ?config.time_only_default_flags, "appending time-only default flags");
        args.extend(config.time_only_default_flags.iter().cloned());
    }
    Some(args)
}

/// Checks the arguments as typed, so a literal help flag wins over anything
/// the configuration injects.
pub fn wants_help(raw: &[String]) -> bool {
    raw.iter().any(|a| a == "-h" || a == "--help")
}
