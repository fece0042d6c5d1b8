//! Groups posts into per-year buckets for the archive page. See
//! [`create_archive`].

use chrono::{DateTime, Datelike, FixedOffset};

/// Anything with a publication timestamp can be archived.
pub trait Dated {
    fn date(&self) -> DateTime<FixedOffset>;
}

impl Dated for DateTime<FixedOffset> {
    fn date(&self) -> DateTime<FixedOffset> {
        *self
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> DateTime<FixedOffset> {
        (**self).date()
    }
}

/// One year of the archive: the year itself and the posts published in it,
/// most recent first.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveYear<T> {
    pub year: i32,
    pub post_list: Vec<T>,
}

/// Buckets `posts` by the year of their date. Buckets are ordered by year,
/// newest first, and posts within a bucket are ordered by timestamp (whole
/// seconds), newest first. Every post lands in exactly one bucket; the order
/// of posts sharing a timestamp is unspecified.
pub fn create_archive<P: Dated>(posts: &[P]) -> Vec<ArchiveYear<&P>> {
    let mut years: Vec<i32> = posts.iter().map(|p| p.date().year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    let mut archive: Vec<ArchiveYear<&P>> = years
        .into_iter()
        .map(|year| ArchiveYear {
            year,
            post_list: posts.iter().filter(|p| p.date().year() == year).collect(),
        })
        .collect();

    for bucket in archive.iter_mut() {
        bucket
            .post_list
            .sort_unstable_by_key(|p| std::cmp::Reverse(p.date().timestamp()));
    }
    archive
}
