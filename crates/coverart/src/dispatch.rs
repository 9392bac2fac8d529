use futures::{stream::FuturesUnordered, StreamExt};
use log::{info, trace, warn};

use crate::{
    api::{google_books, Client},
    config::Selectors,
    cover::Cover,
    page::Page,
    Error,
};

/// Looks up a single ISBN and maps the reply to a [`Cover`].
///
/// Any failure of the request ends as [`Cover::Failed`], it is never retried.
pub(crate) async fn lookup<C: Client>(client: &C, endpoint: &str, isbn: &str) -> Cover {
    match google_books::get_volumes(client, endpoint, isbn).await {
        Ok(response) => Cover::from(response),
        Err(err) => {
            warn!("Lookup for ISBN '{isbn}' failed: {err}");
            Cover::Failed
        }
    }
}

/// Scans `page` and looks up every entry that has an ISBN.
///
/// All lookups are started before any completes. Each lookup owns its ISBN and the placeholder
/// handle taken at scan time and writes its outcome into that placeholder as soon as it resolves,
/// so replies may arrive in any order. Entries without an ISBN are left untouched.
///
/// Returns the number of lookups issued.
pub(crate) async fn enrich<C: Client>(
    client: &C,
    endpoint: &str,
    selectors: &Selectors,
    page: &mut Page,
) -> Result<usize, Error> {
    let mut pending = page
        .scan(selectors)
        .into_iter()
        .filter_map(|entry| {
            let (isbn, placeholder) = entry.into_parts();
            let Some(isbn) = isbn else {
                trace!("Book entry has no ISBN - no lookup issued");
                return None;
            };

            Some(async move {
                let cover = lookup(client, endpoint, &isbn).await;
                (isbn, placeholder, cover)
            })
        })
        .collect::<FuturesUnordered<_>>();

    let issued = pending.len();
    trace!("{issued} lookups issued");

    while let Some((isbn, placeholder, cover)) = pending.next().await {
        info!("ISBN '{isbn}': {}", cover.alt());
        cover.apply(page, placeholder)?;
    }

    Ok(issued)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        api::MockClient,
        cover::{ERROR_TEXT, NO_IMAGE_TEXT, NO_RESULTS_TEXT},
        page::{Page, PlaceholderState},
        Config, ErrorKind, GOOGLE_BOOKS_ENDPOINT,
    };

    const GOOGLE_BOOK_JSON: &str = include_str!("../tests/data/google_books_volume.json");
    const NO_IMAGE_JSON: &str = include_str!("../tests/data/google_books_no_image.json");
    const CODE_COMPLETE_THUMBNAIL: &str = "http://books.google.com/books/content?id=LpVCAwAAQBAJ&printsec=frontcover&img=1&zoom=1&source=gbs_api";

    fn volume(title: &str, thumbnail: &str) -> String {
        format!(
            r#"{{ "items": [ {{ "volumeInfo": {{ "title": "{title}", "imageLinks": {{ "thumbnail": "{thumbnail}" }} }} }} ] }}"#
        )
    }

    async fn run(client: &MockClient, html: &str) -> (Page, Vec<Option<PlaceholderState>>, usize) {
        let mut page = Page::parse(html);
        let selectors = Config::default().selectors().unwrap();
        let placeholders = page
            .scan(&selectors)
            .iter()
            .map(crate::page::Entry::placeholder)
            .collect::<Vec<_>>();

        let issued = super::enrich(client, GOOGLE_BOOKS_ENDPOINT, &selectors, &mut page)
            .await
            .expect("placeholders come from the same page");

        let states = placeholders.iter().map(|p| page.placeholder(*p)).collect();
        (page, states, issued)
    }

    fn state(src: Option<&str>, alt: Option<&str>) -> Option<PlaceholderState> {
        Some(PlaceholderState {
            src: src.map(str::to_owned),
            alt: alt.map(str::to_owned),
        })
    }

    #[tokio::test]
    async fn only_non_empty_isbns_are_looked_up() {
        let client = MockClient::default().reply("9780143127741", NO_IMAGE_JSON);
        let (_, states, issued) = run(
            &client,
            r#"<div class="book" data-isbn="9780143127741"><img class="thumbnail"></div>
               <div class="book" data-isbn=""><img class="thumbnail" src="default.png" alt="Book"></div>"#,
        )
        .await;

        assert_eq!(1, issued);
        assert_eq!(
            vec!["https://www.googleapis.com/books/v1/volumes?q=isbn:9780143127741".to_owned()],
            client.urls()
        );
        assert_eq!(state(None, Some(NO_IMAGE_TEXT)), states[0]);
        // untouched
        assert_eq!(state(Some("default.png"), Some("Book")), states[1]);
    }

    #[tokio::test]
    async fn found_cover_sets_src_and_alt() {
        let client = MockClient::default().reply("0735619670", GOOGLE_BOOK_JSON);
        let (page, states, _) = run(
            &client,
            r#"<div class="book" data-isbn="0-7356-1967-0"><img class="thumbnail"></div>"#,
        )
        .await;

        assert_eq!(
            vec!["https://www.googleapis.com/books/v1/volumes?q=isbn:0735619670".to_owned()],
            client.urls()
        );
        assert_eq!(
            state(Some(CODE_COMPLETE_THUMBNAIL), Some("Code Complete Cover")),
            states[0]
        );
        assert!(page.html().contains(r#"alt="Code Complete Cover""#));
    }

    #[tokio::test]
    async fn empty_results_and_failures_keep_the_src() {
        let client = MockClient::default()
            .reply("1111111111", r#"{ "kind": "books#volumes", "totalItems": 0 }"#)
            .fail("2222222222", ErrorKind::Status)
            .reply("3333333333", "<html>not json</html>");
        let (_, states, issued) = run(
            &client,
            r#"<div class="book" data-isbn="1111111111"><img class="thumbnail" src="a.png"></div>
               <div class="book" data-isbn="2222222222"><img class="thumbnail" src="b.png"></div>
               <div class="book" data-isbn="3333333333"><img class="thumbnail" src="c.png"></div>
               <div class="book" data-isbn="4444444444"><img class="thumbnail" src="d.png"></div>"#,
        )
        .await;

        assert_eq!(4, issued);
        assert_eq!(state(Some("a.png"), Some(NO_RESULTS_TEXT)), states[0]);
        assert_eq!(state(Some("b.png"), Some(ERROR_TEXT)), states[1]);
        assert_eq!(state(Some("c.png"), Some(ERROR_TEXT)), states[2]);
        // no reply configured is a network error
        assert_eq!(state(Some("d.png"), Some(ERROR_TEXT)), states[3]);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_order_replies_update_their_own_placeholder() {
        // A is slow, B answers first
        let client = MockClient::default()
            .reply_after(
                "1111111111",
                volume("Book A", "http://covers/a.jpg"),
                Duration::from_millis(60),
            )
            .reply_after(
                "2222222222",
                volume("Book B", "http://covers/b.jpg"),
                Duration::from_millis(5),
            );
        let html = r#"<div class="book" data-isbn="1111111111"><img class="thumbnail"></div>
                      <div class="book" data-isbn="2222222222"><img class="thumbnail"></div>"#;

        let (_, states, issued) = run(&client, html).await;

        assert_eq!(2, issued);
        assert_eq!(
            state(Some("http://covers/a.jpg"), Some("Book A Cover")),
            states[0]
        );
        assert_eq!(
            state(Some("http://covers/b.jpg"), Some("Book B Cover")),
            states[1]
        );

        // and the other way around
        let client = MockClient::default()
            .reply_after(
                "1111111111",
                volume("Book A", "http://covers/a.jpg"),
                Duration::from_millis(5),
            )
            .reply_after(
                "2222222222",
                volume("Book B", "http://covers/b.jpg"),
                Duration::from_millis(60),
            );

        let (_, reversed, _) = run(&client, html).await;
        assert_eq!(states, reversed);
    }

    #[tokio::test(start_paused = true)]
    async fn all_lookups_are_issued_before_any_completes() {
        let client = MockClient::default()
            .reply_after("1111111111", NO_IMAGE_JSON, Duration::from_millis(30))
            .reply_after("2222222222", NO_IMAGE_JSON, Duration::from_millis(30))
            .reply_after("3333333333", NO_IMAGE_JSON, Duration::from_millis(30));

        let started = tokio::time::Instant::now();
        let (_, _, issued) = run(
            &client,
            r#"<div class="book" data-isbn="1111111111"><img class="thumbnail"></div>
               <div class="book" data-isbn="2222222222"><img class="thumbnail"></div>
               <div class="book" data-isbn="3333333333"><img class="thumbnail"></div>"#,
        )
        .await;

        assert_eq!(3, issued);
        assert_eq!(3, client.urls().len());
        // the paused clock only advances while every lookup is waiting, sequential lookups
        // would take 90ms
        assert!(started.elapsed() < Duration::from_millis(60));
    }

    #[tokio::test]
    async fn title_is_written_without_trimming() {
        let client = MockClient::default().reply("1111111111", volume(" Dune ", "http://covers/d.jpg"));
        let (_, states, _) = run(
            &client,
            r#"<div class="book" data-isbn="1111111111"><img class="thumbnail"></div>"#,
        )
        .await;

        assert_eq!(
            state(Some("http://covers/d.jpg"), Some(" Dune  Cover")),
            states[0]
        );
    }

    #[tokio::test]
    async fn blank_isbn_is_still_looked_up() {
        let client = MockClient::default();
        let (_, states, issued) = run(
            &client,
            r#"<div class="book" data-isbn="   "><img class="thumbnail"></div>"#,
        )
        .await;

        assert_eq!(1, issued);
        assert_eq!(
            vec!["https://www.googleapis.com/books/v1/volumes?q=isbn:   ".to_owned()],
            client.urls()
        );
        assert_eq!(state(None, Some(ERROR_TEXT)), states[0]);
    }

    #[tokio::test]
    async fn failure_of_one_entry_does_not_affect_another() {
        let client = MockClient::default()
            .fail("1111111111", ErrorKind::IO)
            .reply("2222222222", volume("Book B", "http://covers/b.jpg"));
        let (_, states, _) = run(
            &client,
            r#"<div class="book" data-isbn="1111111111"><img class="thumbnail"></div>
               <div class="book" data-isbn="2222222222"><img class="thumbnail"></div>"#,
        )
        .await;

        assert_eq!(state(None, Some(ERROR_TEXT)), states[0]);
        assert_eq!(
            state(Some("http://covers/b.jpg"), Some("Book B Cover")),
            states[1]
        );
    }

    #[tokio::test]
    async fn single_lookup_maps_the_reply() {
        let client = MockClient::default().reply("0735619670", GOOGLE_BOOK_JSON);
        let cover = super::lookup(&client, GOOGLE_BOOKS_ENDPOINT, "0735619670").await;

        assert_eq!(Some(CODE_COMPLETE_THUMBNAIL), cover.src());
        assert_eq!(
            crate::Cover::Failed,
            super::lookup(&client, GOOGLE_BOOKS_ENDPOINT, "9999999999").await
        );
    }
}
