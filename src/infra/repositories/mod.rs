use crate::domain::ports::{DUPLICATE_CHARITY_MSG, DUPLICATE_LICENSE_MSG};
use crate::error::{is_unique_violation, AppError};

pub mod sqlite_auth_repo;
pub mod sqlite_campaign_repo;
pub mod sqlite_charity_repo;
pub mod sqlite_financial_report_repo;
pub mod sqlite_news_repo;
pub mod sqlite_user_repo;
pub mod sqlite_vote_repo;

pub mod postgres_auth_repo;
pub mod postgres_campaign_repo;
pub mod postgres_charity_repo;
pub mod postgres_financial_report_repo;
pub mod postgres_news_repo;
pub mod postgres_user_repo;
pub mod postgres_vote_repo;

/// Maps a storage-level unique violation on `charities` to the same
/// conflict the pre-insert checks report.
pub(crate) fn unique_conflict(e: sqlx::Error) -> AppError {
    if !is_unique_violation(&e) {
        return AppError::Database(e);
    }
    let on_owner = e.as_database_error()
        .map(|db_err| db_err.message().contains("user_id"))
        .unwrap_or(false);
    if on_owner {
        AppError::Conflict(DUPLICATE_CHARITY_MSG.into())
    } else {
        AppError::Conflict(DUPLICATE_LICENSE_MSG.into())
    }
}

pub(crate) const LIKE_ESCAPE: &str = " ESCAPE '\\'";

/// Wraps user search text as a substring pattern with `%`, `_` and `\` matched literally.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn escapes_wildcards_in_search_text() {
        assert_eq!(like_pattern("water"), "%water%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }
}
