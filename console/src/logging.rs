use colored::*;
use std::io;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormattedFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// One line per event: a colored level marker, the election operation it
/// happened in (the `#[instrument]` span and its arguments), then the message.
/// Debug and trace lines also name the emitting module.
pub struct OperationFormatter;

fn marker(level: Level) -> ColoredString {
    match level {
        Level::TRACE => "[ ]".dimmed(),
        Level::DEBUG => "[?]".blue(),
        Level::INFO => "[+]".green().bold(),
        Level::WARN => "[*]".yellow().bold(),
        Level::ERROR => "[-]".red().bold(),
    }
}

impl<S, N> FormatEvent<S, N> for OperationFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(writer, "{} ", marker(*meta.level()))?;
        if *meta.level() >= Level::DEBUG {
            write!(writer, "{} ", meta.target().dimmed())?;
        }

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name().bold())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{}}}", fields)?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `RUST_LOG` wins; otherwise each `-v` raises the level from `warn`.
pub fn init(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(env_filter)
        .event_format(OperationFormatter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(level: Level, emit: impl FnOnce()) -> String {
        colored::control::set_override(false);
        let out = Captured::default();
        let sink = out.clone();
        let subscriber = fmt()
            .with_max_level(level)
            .with_ansi(false)
            .event_format(OperationFormatter)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn prefixes_the_operation_span() {
        let text = capture(Level::INFO, || {
            let span = tracing::info_span!("cast_vote", voter_id = 3);
            let _entered = span.enter();
            tracing::info!("vote counted");
        });
        assert_eq!(text, "[+] cast_vote{voter_id=3}: vote counted\n");
    }

    #[test]
    fn plain_warning_has_marker_only() {
        let text = capture(Level::INFO, || tracing::warn!("voters.txt not found"));
        assert_eq!(text, "[*] voters.txt not found\n");
    }

    #[test]
    fn debug_lines_name_their_module() {
        let text = capture(Level::DEBUG, || {
            tracing::debug!(target: "shared::candidate_store", "wrote 2 candidates");
        });
        assert_eq!(text, "[?] shared::candidate_store wrote 2 candidates\n");
    }
}
