//! Printing search results

use std::io::{self, Write};
use std::path::{MAIN_SEPARATOR, is_separator};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print matching paths one per line, the last component highlighted
pub fn print_paths(paths: &[String], choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    for path in paths {
        write_path(&mut stdout, path)?;
    }
    stdout.flush()
}

fn write_path<W: WriteColor>(out: &mut W, path: &str) -> io::Result<()> {
    let split = path
        .trim_end_matches(is_separator)
        .rfind(is_separator)
        .map(|i| i + MAIN_SEPARATOR.len_utf8())
        .unwrap_or(0);
    let (parent, leaf) = path.split_at(split);

    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
    write!(out, "{}", parent)?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "{}", leaf)?;
    out.reset()?;
    writeln!(out)
}

/// Tell the user nothing matched
pub fn print_no_matches(terms: &[String], choice: ColorChoice) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(choice);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    write!(stderr, "No matching directories")?;
    stderr.reset()?;
    writeln!(stderr, " for: {}", terms.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    fn render(path: &str) -> String {
        let mut out = NoColor::new(Vec::new());
        write_path(&mut out, path).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_write_path_plain() {
        let sep = MAIN_SEPARATOR;
        let path = format!("{sep}code{sep}proj");
        assert_eq!(render(&path), format!("{path}\n"));
        assert_eq!(render("proj"), "proj\n");
    }
}
