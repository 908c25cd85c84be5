use std::sync::LazyLock;

use regex::Regex;

static THREAD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"forum/(\d+)/(\d+)").expect("Invalid thread link regex"));

/// Forum category and thread an article points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadTarget {
    pub category_id: i64,
    pub thread_id: i64,
}

/// Find the thread referenced by the *last* `forum/<category>/<thread>` link.
///
/// Articles often reference older threads first; the trailing link is the
/// one the update belongs to.
#[must_use]
pub fn find_thread_target(body: &str) -> Option<ThreadTarget> {
    THREAD_LINK
        .captures_iter(body)
        .filter_map(|caps| {
            Some(ThreadTarget {
                category_id: caps[1].parse().ok()?,
                thread_id: caps[2].parse().ok()?,
            })
        })
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_link_wins() {
        let body = r#"<p>See <a href="https://example.gr/forum/5/10">old</a> and
            <a href="https://example.gr/forum/7/20-match-thread">new</a>.</p>"#;
        assert_eq!(
            find_thread_target(body),
            Some(ThreadTarget {
                category_id: 7,
                thread_id: 20
            })
        );
    }

    #[test]
    fn test_single_link() {
        assert_eq!(
            find_thread_target("/forum/3/1234#5678"),
            Some(ThreadTarget {
                category_id: 3,
                thread_id: 1234
            })
        );
    }

    #[test]
    fn test_no_link() {
        assert_eq!(find_thread_target("<p>forum topic</p>"), None);
        assert_eq!(find_thread_target("forum/abc/12"), None);
    }

    #[test]
    fn test_overflowing_ids_are_ignored() {
        assert_eq!(
            find_thread_target("forum/1/2 forum/99999999999999999999/1"),
            Some(ThreadTarget {
                category_id: 1,
                thread_id: 2
            })
        );
    }
}
