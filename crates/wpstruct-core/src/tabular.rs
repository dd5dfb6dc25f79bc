// Colon-separated one-line listings of records.
use chrono::NaiveDateTime;

use crate::records::{Comment, User};
use crate::value::ISO_DATE_FORMAT;

pub const COLUMN_SEPARATOR: &str = ":";

pub trait StringHeader {
    fn string_header() -> String;

    fn string_row(&self) -> String;
}

fn join(cols: &[String]) -> String {
    cols.join(COLUMN_SEPARATOR)
}

fn text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn int(v: &Option<i32>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn date(v: &Option<NaiveDateTime>) -> String {
    v.map(|d| d.format(ISO_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

impl StringHeader for User {
    fn string_header() -> String {
        ["First name", "Last name", "Nick name", "Url", "User ID"].join(COLUMN_SEPARATOR)
    }

    fn string_row(&self) -> String {
        join(&[
            text(&self.first_name),
            text(&self.last_name),
            text(&self.nickname),
            text(&self.url),
            int(&self.user_id),
        ])
    }
}

impl StringHeader for Comment {
    fn string_header() -> String {
        [
            "Date Created GMT",
            "User Id",
            "Comment Id",
            "Parent",
            "Status",
            "Content",
            "Link",
            "Post Id",
            "Post Title",
            "Author",
            "Author URL",
            "Author Email",
            "Author IP",
        ]
        .join(COLUMN_SEPARATOR)
    }

    fn string_row(&self) -> String {
        join(&[
            date(&self.date_created_gmt),
            int(&self.user_id),
            int(&self.comment_id),
            int(&self.parent),
            text(&self.status),
            text(&self.content),
            text(&self.link),
            int(&self.post_id),
            text(&self.post_title),
            text(&self.author),
            text(&self.author_url),
            text(&self.author_email),
            text(&self.author_ip),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_row_matches_header_columns() {
        let user = User {
            first_name: Some("Ada".into()),
            nickname: Some("ada".into()),
            user_id: Some(7),
            ..User::default()
        };
        assert_eq!(User::string_header(), "First name:Last name:Nick name:Url:User ID");
        assert_eq!(user.string_row(), "Ada::ada::7");
    }

    #[test]
    fn comment_row_has_one_column_per_title() {
        let header_cols = Comment::string_header().split(COLUMN_SEPARATOR).count();
        let row_cols = Comment::default().string_row().split(COLUMN_SEPARATOR).count();
        assert_eq!(header_cols, row_cols);
    }
}
