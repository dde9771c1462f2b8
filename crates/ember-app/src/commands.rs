//! Line-oriented commands that drive a [`Browser`].

use std::io::Write;

use anyhow::{Context, Result, bail};
use ember_browser::{Browser, CloseOutcome, FontWeight};

pub const HELP: &str = "\
commands:
  open <url or search>   load a page in the current tab
  back | forward         move through the tab's history
  reload | home          refetch the page / go to home://
  click <x> <y>          follow the link under a viewport point
  scroll <dy>            scroll by dy pixels (negative is up)
  top | bottom           jump to the start or end of the page
  resize <w> <h>         change the viewport size
  new | close <i> | switch <i> | tabs
  private                open a tab kept out of the history list
  bookmark | bookmarks | history
  dump                   print the current display list
  help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Back,
    Forward,
    Reload,
    Home,
    Click(i32, i32),
    Scroll(i32),
    Top,
    Bottom,
    Resize(i32, i32),
    NewTab,
    PrivateTab,
    Close(usize),
    Switch(usize),
    Tabs,
    Bookmark,
    Bookmarks,
    History,
    Dump,
    Help,
    Quit,
}

/// Whether the driver loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let cmd = match name {
            "open" | "go" => {
                if rest.is_empty() {
                    bail!("usage: open <url or search>");
                }
                Command::Open(rest.to_string())
            },
            "back" => Command::Back,
            "forward" => Command::Forward,
            "reload" => Command::Reload,
            "home" => Command::Home,
            "click" => {
                let [x, y] = two_args(&args, "click <x> <y>")?;
                Command::Click(x, y)
            },
            "scroll" => Command::Scroll(one_arg(&args, "scroll <dy>")?),
            "top" => Command::Top,
            "bottom" => Command::Bottom,
            "resize" => {
                let [w, h] = two_args(&args, "resize <w> <h>")?;
                if w <= 0 || h <= 0 {
                    bail!("viewport size must be positive");
                }
                Command::Resize(w, h)
            },
            "new" => Command::NewTab,
            "private" => Command::PrivateTab,
            "close" => Command::Close(one_arg(&args, "close <index>")?),
            "switch" => Command::Switch(one_arg(&args, "switch <index>")?),
            "tabs" => Command::Tabs,
            "bookmark" => Command::Bookmark,
            "bookmarks" => Command::Bookmarks,
            "history" => Command::History,
            "dump" => Command::Dump,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command `{other}` (try `help`)"),
        };
        Ok(Some(cmd))
    }
}

fn one_arg<T: std::str::FromStr>(args: &[&str], usage: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match args {
        [a] => a.parse().with_context(|| format!("usage: {usage}")),
        _ => bail!("usage: {usage}"),
    }
}

fn two_args(args: &[&str], usage: &str) -> Result<[i32; 2]> {
    match args {
        [a, b] => {
            let a = a.parse().with_context(|| format!("usage: {usage}"))?;
            let b = b.parse().with_context(|| format!("usage: {usage}"))?;
            Ok([a, b])
        },
        _ => bail!("usage: {usage}"),
    }
}

/// Apply `cmd` to `browser`, writing any report to `out`.
pub fn execute(cmd: Command, browser: &mut Browser, out: &mut impl Write) -> Result<Flow> {
    match cmd {
        Command::Open(input) => {
            if let Some(url) = browser.navigate_input(&input) {
                report_page(browser, out)?;
                log::debug!("opened {url}");
            }
        },
        Command::Back => {
            if browser.back() {
                report_page(browser, out)?;
            } else {
                writeln!(out, "no previous page")?;
            }
        },
        Command::Forward => {
            if browser.forward() {
                report_page(browser, out)?;
            } else {
                writeln!(out, "no next page")?;
            }
        },
        Command::Reload => {
            browser.reload();
            report_page(browser, out)?;
        },
        Command::Home => {
            browser.go_home();
            report_page(browser, out)?;
        },
        Command::Click(x, y) => match browser.click(x, y) {
            Some(_) => report_page(browser, out)?,
            None => writeln!(out, "no link at ({x}, {y})")?,
        },
        Command::Scroll(dy) => {
            browser.scroll_by(dy);
            report_scroll(browser, out)?;
        },
        Command::Top => {
            browser.scroll_mut().scroll_to_top();
            report_scroll(browser, out)?;
        },
        Command::Bottom => {
            browser.scroll_mut().scroll_to_bottom();
            report_scroll(browser, out)?;
        },
        Command::Resize(w, h) => {
            browser.resize(w, h);
            writeln!(out, "viewport {w}x{h}")?;
        },
        Command::NewTab => {
            browser.new_tab();
            report_tabs(browser, out)?;
        },
        Command::PrivateTab => {
            browser.new_private_tab();
            report_tabs(browser, out)?;
        },
        Command::Close(i) => {
            if browser.close_tab(i) == CloseOutcome::Ignored {
                writeln!(out, "no tab {i}")?;
            } else {
                report_tabs(browser, out)?;
            }
        },
        Command::Switch(i) => {
            if browser.switch_tab(i) {
                report_page(browser, out)?;
            } else {
                writeln!(out, "no tab {i}")?;
            }
        },
        Command::Tabs => report_tabs(browser, out)?,
        Command::Bookmark => {
            let url = browser.current_tab().url.clone();
            if browser.add_bookmark() {
                writeln!(out, "bookmarked {url}")?;
            } else {
                writeln!(out, "not bookmarked: {url}")?;
            }
        },
        Command::Bookmarks => list(out, browser.bookmarks().iter())?,
        Command::History => {
            let visited: Vec<&str> = browser.visited().iter().collect();
            list(out, visited.into_iter().rev())?;
        },
        Command::Dump => dump(browser, out)?,
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn report_page(browser: &Browser, out: &mut impl Write) -> Result<()> {
    let tab = browser.current_tab();
    let status = match &tab.error {
        Some(_) => "error",
        None => "ok",
    };
    writeln!(
        out,
        "[{status}] {} <{}> {} words, {} links, height {}",
        tab.title,
        tab.url,
        tab.layout.fragments.len(),
        tab.layout.links.len(),
        tab.layout.content_height
    )?;
    Ok(())
}

fn report_scroll(browser: &Browser, out: &mut impl Write) -> Result<()> {
    let scroll = &browser.current_tab().scroll;
    let (start, end) = scroll.thumb();
    writeln!(
        out,
        "scroll {}/{} (thumb {:.2}..{:.2})",
        scroll.scroll_y,
        scroll.max_scroll(),
        start,
        end
    )?;
    Ok(())
}

fn report_tabs(browser: &Browser, out: &mut impl Write) -> Result<()> {
    let tabs = browser.tabs();
    for (i, tab) in tabs.tabs().iter().enumerate() {
        let marker = if i == tabs.current_index() { '*' } else { ' ' };
        let private = if tab.private { " (private)" } else { "" };
        writeln!(out, "{marker} {i}: {} <{}>{private}", tab.title, tab.url)?;
    }
    Ok(())
}

fn list<'a>(out: &mut impl Write, urls: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut any = false;
    for url in urls {
        writeln!(out, "  {url}")?;
        any = true;
    }
    if !any {
        writeln!(out, "  (empty)")?;
    }
    Ok(())
}

/// Print every fragment visible in the viewport, in viewport
/// coordinates, with its style flags.
fn dump(browser: &Browser, out: &mut impl Write) -> Result<()> {
    let tab = browser.current_tab();
    let (_, height) = browser.viewport();
    let top = tab.scroll.scroll_y;

    report_page(browser, out)?;
    for f in &tab.layout.fragments {
        let y = f.y - top;
        if y < 0 || y >= height {
            continue;
        }
        let mut flags = String::new();
        if f.style.font_weight == FontWeight::Bold {
            flags.push_str(" bold");
        }
        if f.style.font_size != browser.config().layout.base_font_size {
            flags.push_str(&format!(" {}px", f.style.font_size));
        }
        if let Some(link) = &f.style.link {
            flags.push_str(&format!(" -> {link}"));
        }
        writeln!(out, "{:>5} {:>5}  {}{}", f.x, y, f.text, flags)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ember_browser::BrowserConfig;
    use ember_net::FetchError;

    use super::*;

    fn browser() -> Browser {
        let fetch = |url: &str| -> Result<String, FetchError> {
            match url {
                "https://a.test/" => Ok("<title>A</title><p>go <a href=\"https://b.test/\">there</a></p>".into()),
                "https://b.test/" => Ok("<h1>B</h1>".into()),
                _ => Err(FetchError::Malformed),
            }
        };
        Browser::new(BrowserConfig::default(), Box::new(fetch))
    }

    fn run(browser: &mut Browser, line: &str) -> String {
        let cmd = Command::parse(line).unwrap().unwrap();
        let mut out = Vec::new();
        execute(cmd, browser, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_basic_commands() {
        assert_eq!(Command::parse("back").unwrap(), Some(Command::Back));
        assert_eq!(
            Command::parse("open rust lang").unwrap(),
            Some(Command::Open("rust lang".into()))
        );
        assert_eq!(Command::parse("click 10 -3").unwrap(), Some(Command::Click(10, -3)));
        assert_eq!(Command::parse("  scroll -40 ").unwrap(), Some(Command::Scroll(-40)));
        assert_eq!(Command::parse("close 2").unwrap(), Some(Command::Close(2)));
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("# comment").unwrap(), None);
    }

    #[test]
    fn parse_errors() {
        assert!(Command::parse("open").is_err());
        assert!(Command::parse("click 1").is_err());
        assert!(Command::parse("click a b").is_err());
        assert!(Command::parse("close -1").is_err());
        assert!(Command::parse("resize 0 10").is_err());
        assert!(Command::parse("teleport").is_err());
    }

    #[test]
    fn open_reports_page() {
        let mut b = browser();
        let out = run(&mut b, "open a.test/");
        assert_eq!(out, "[ok] A <https://a.test/> 3 words, 1 links, height 78\n");
    }

    #[test]
    fn failed_open_reports_error() {
        let mut b = browser();
        let out = run(&mut b, "open https://down.test/");
        assert!(out.starts_with("[error] https://down.test/"));
    }

    #[test]
    fn click_and_back() {
        let mut b = browser();
        run(&mut b, "open https://a.test/");
        let link = b.current_tab().layout.links[0].clone();
        let out = run(&mut b, &format!("click {} {}", link.x1, link.y1));
        assert!(out.contains("<https://b.test/>"));
        assert!(run(&mut b, "back").contains("<https://a.test/>"));
        assert_eq!(run(&mut b, "click 0 0"), "no link at (0, 0)\n");
    }

    #[test]
    fn tabs_listing_marks_current() {
        let mut b = browser();
        run(&mut b, "new");
        let out = run(&mut b, "tabs");
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().nth(1).unwrap().starts_with("* 1:"));
        assert_eq!(run(&mut b, "switch 9"), "no tab 9\n");
    }

    #[test]
    fn private_tab_skips_history_list() {
        let mut b = browser();
        run(&mut b, "open https://a.test/");
        let out = run(&mut b, "private");
        assert!(out.lines().nth(1).unwrap().ends_with("(private)"));
        run(&mut b, "open https://b.test/");
        assert!(run(&mut b, "back").contains("<home://>"));
        assert_eq!(run(&mut b, "history"), "  https://a.test/\n");
    }

    #[test]
    fn bookmark_and_history_lists() {
        let mut b = browser();
        assert_eq!(run(&mut b, "bookmarks"), "  (empty)\n");
        run(&mut b, "open https://a.test/");
        run(&mut b, "open https://b.test/");
        assert_eq!(run(&mut b, "bookmark"), "bookmarked https://b.test/\n");
        assert_eq!(run(&mut b, "bookmarks"), "  https://b.test/\n");
        assert_eq!(run(&mut b, "history"), "  https://b.test/\n  https://a.test/\n");
    }

    #[test]
    fn dump_lists_fragments_with_flags() {
        let mut b = browser();
        run(&mut b, "open https://a.test/");
        let out = run(&mut b, "dump");
        assert!(out.contains("there -> https://b.test/"));
        run(&mut b, "open https://b.test/");
        let out = run(&mut b, "dump");
        assert!(out.contains("B bold 32px"));
    }

    #[test]
    fn quit_stops_loop() {
        let mut b = browser();
        let mut out = Vec::new();
        assert_eq!(execute(Command::Quit, &mut b, &mut out).unwrap(), Flow::Quit);
    }
}
