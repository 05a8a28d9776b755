//! Evaluator execution tracing
//!
//! With the `debug` feature enabled, every evaluator step writes a
//! depth-indented line to stderr on entry and exit, with the exit line
//! coloured by outcome and annotated with the number of bytes consumed:
//!
//! ```text
//! > or      | "1+2*3"∅
//! . > char '(' | "1+2*3"∅
//! . < char '(' | fail
//! . > range '0'-'9' | "1+2*3"∅
//! . < range '0'-'9' | +1
//! < or      | +1
//! ```
//!
//! Tracing is unconditional while the feature is on; build without it for
//! quiet parsers.

use std::io::Write;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::error::escape_str;
use crate::stream::Input;

static DEPTH: AtomicUsize = AtomicUsize::new(0);

const SNIPPET_WIDTH: usize = 24;
const CALL_WIDTH: usize = 34;

pub(crate) struct Frame {
    depth: usize,
    name: String,
    start: usize,
}

pub(crate) fn enter(name: &str, input: &Input<'_>) -> Frame {
    let depth = DEPTH.fetch_add(1, Ordering::SeqCst);
    let gutter = anstyle::Style::new().bold();
    let snippet_style = anstyle::Style::new().underline();

    let call = format!("{} > {name}", Dots(depth));
    let call_width = CALL_WIDTH;
    let (snippet, eof) = snippet(input);

    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{call:call_width$} {}|{} {}\"{snippet}\"{}{eof}",
        gutter.render(),
        gutter.render_reset(),
        snippet_style.render(),
        snippet_style.render_reset(),
    );

    Frame {
        depth,
        name: name.to_owned(),
        start: input.offset(),
    }
}

pub(crate) fn exit(frame: Frame, input: &Input<'_>, ok: bool) {
    DEPTH.fetch_sub(1, Ordering::SeqCst);
    let gutter = anstyle::Style::new().bold();
    let outcome_style = if ok {
        anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Green.into()))
    } else {
        anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Red.into()))
    };
    let outcome = if ok {
        format!("+{}", input.offset().saturating_sub(frame.start))
    } else {
        "fail".to_owned()
    };

    let call = format!("{} < {}", Dots(frame.depth), frame.name);
    let call_width = CALL_WIDTH;
    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{call:call_width$} {}|{} {}{outcome}{}",
        gutter.render(),
        gutter.render_reset(),
        outcome_style.render(),
        outcome_style.render_reset(),
    );
}

/// The start of the remaining input, escaped, with `∅` marking a visible end
/// of input.
fn snippet(input: &Input<'_>) -> (String, &'static str) {
    let rest = input.rest();
    let shown = &rest[..rest.len().min(SNIPPET_WIDTH)];
    let escaped = escape_str(&shown.iter().map(|&b| char::from(b)).collect::<String>());
    let eof = if rest.len() <= SNIPPET_WIDTH { "∅" } else { "" };
    (escaped, eof)
}

/// Indentation as `. . . `, one dot per depth level.
struct Dots(usize);

impl std::fmt::Display for Dots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.0 {
            f.write_str(". ")?;
        }
        Ok(())
    }
}
