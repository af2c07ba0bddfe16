//! Subscriber setup for the `readme-card` binary.
//!
//! `README_CARD_LOG` takes precedence over `RUST_LOG`. Without either, the
//! card crate logs at `info` (`debug` with `--verbose`) while the HTTP stack is
//! kept quiet.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

const ENV_VAR: &str = "README_CARD_LOG";

static INIT: Once = Once::new();

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,readme_card=debug,hyper=info,reqwest=info"
    } else {
        "info,hyper=warn,reqwest=warn"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Installs the global subscriber. `log` records from the rendering modules
/// are forwarded to it.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(filter(verbose))
            .with_target(verbose)
            .compact()
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        for verbose in [false, true] {
            let directives = default_directives(verbose);
            assert!(EnvFilter::try_new(directives).is_ok(), "{directives}");
        }
    }

    #[test]
    fn verbose_only_raises_this_crate() {
        assert!(default_directives(true).contains("readme_card=debug"));
        assert!(!default_directives(false).contains("debug"));
    }
}
