//! The built-in `home://` page.

/// URL of the locally generated home page. Never sent to the network.
pub const HOME_URL: &str = "home://";

pub fn is_home(url: &str) -> bool {
    url == HOME_URL
}

/// Markup for the home page: a heading and one link per bookmark.
pub fn home_page_html(bookmarks: &[String]) -> String {
    let mut html = String::from("<html><head><title>Home</title></head><body><h1>Ember</h1>");
    if bookmarks.is_empty() {
        html.push_str("<p>No bookmarks yet.</p>");
    } else {
        html.push_str("<h2>Bookmarks</h2><p>");
        for url in bookmarks {
            let url = markup_safe(url);
            html.push_str(&format!("<a href=\"{url}\">{url}</a><br>"));
        }
        html.push_str("</p>");
    }
    html.push_str("</body></html>");
    html
}

/// Percent-encode the characters that would end an attribute or open a
/// tag. The tokenizer does not decode entities, so `&lt;` would show up
/// literally.
fn markup_safe(url: &str) -> String {
    url.replace('"', "%22")
        .replace('<', "%3C")
        .replace('>', "%3E")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{Token, extract_title, tokenize};

    #[test]
    fn empty_home_page() {
        let tokens = tokenize(&home_page_html(&[]));
        assert_eq!(extract_title(&tokens).as_deref(), Some("Home"));
        assert!(!tokens.iter().any(|t| t.tag_name().as_deref() == Some("a")));
    }

    #[test]
    fn bookmarks_become_links() {
        let bookmarks = vec!["https://a.test/".to_string(), "https://b.test/x".to_string()];
        let tokens = tokenize(&home_page_html(&bookmarks));
        let hrefs: Vec<String> = tokens
            .iter()
            .filter_map(|t| t.attribute("href"))
            .collect();
        assert_eq!(hrefs, bookmarks);
    }

    #[test]
    fn hostile_bookmark_stays_one_link() {
        let bookmarks = vec!["https://e.test/\"><script>".to_string()];
        let tokens = tokenize(&home_page_html(&bookmarks));
        let links: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.tag_name().as_deref() == Some("a"))
            .collect();
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].attribute("href").as_deref(),
            Some("https://e.test/%22%3E%3Cscript%3E")
        );
    }

    #[test]
    fn home_detection() {
        assert!(is_home("home://"));
        assert!(!is_home("https://home.test/"));
    }
}
