//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use monies_types::{Comparison, Money, MoneyError, MoneyRepository, RecordId, RepoError};

    use crate::SqliteMoneyRepo;

    async fn setup_repo() -> SqliteMoneyRepo {
        SqliteMoneyRepo::new("sqlite::memory:").await.unwrap()
    }

    fn money(magnitude: i64, scale: u32, currency: &str) -> Money {
        Money::new(magnitude, scale, currency).unwrap()
    }

    async fn seed(repo: &SqliteMoneyRepo) {
        for (label, amount) in [
            ("coffee", money(250, 2, "GBP")),
            ("lunch", money(1200, 2, "GBP")),
            ("rent", money(95000, 2, "GBP")),
            ("hotel", money(1200, 2, "EUR")),
        ] {
            repo.insert(label, &amount).await.unwrap();
        }
    }

    fn labels(records: &[monies_types::MoneyRecord]) -> Vec<&str> {
        records.iter().map(|r| r.label.as_str()).collect()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = setup_repo().await;

        let record = repo.insert("coffee", &money(199, 2, "GBP")).await.unwrap();
        assert_eq!(record.label, "coffee");

        let fetched = repo.get(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.amount, money(199, 2, "GBP"));
        assert_eq!(fetched.amount.currency(), "GBP");
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let repo = setup_repo().await;

        let result = repo.get(RecordId::new()).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_amounts_are_stored_reduced() {
        let repo = setup_repo().await;

        let record = repo.insert("round", &money(1500, 3, "GBP")).await.unwrap();

        let stored: (String, String) =
            sqlx::query_as("SELECT amount, amount_currency FROM money_records WHERE id = ?")
                .bind(record.id.to_string())
                .fetch_one(repo.pool())
                .await
                .unwrap();
        assert_eq!(stored, ("1.5".to_string(), "GBP".to_string()));

        let fetched = repo.get(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.amount.to_raw(), "15 1 GBP");
    }

    #[tokio::test]
    async fn test_find_equal_matches_any_scale() {
        let repo = setup_repo().await;
        seed(&repo).await;

        let found = repo.find(Comparison::Eq, &money(12, 0, "GBP")).await.unwrap();
        assert_eq!(labels(&found), vec!["lunch"]);

        let found = repo.find(Comparison::Eq, &money(12000, 3, "EUR")).await.unwrap();
        assert_eq!(labels(&found), vec!["hotel"]);

        let found = repo.find(Comparison::Ne, &money(12, 0, "GBP")).await.unwrap();
        assert_eq!(labels(&found), vec!["coffee", "rent"]);
    }

    #[tokio::test]
    async fn test_find_orders_numerically() {
        let repo = setup_repo().await;
        seed(&repo).await;

        // "950" sorts before "12" as text
        let found = repo.find(Comparison::Gt, &money(12, 0, "GBP")).await.unwrap();
        assert_eq!(labels(&found), vec!["rent"]);

        let found = repo.find(Comparison::Le, &money(12, 0, "GBP")).await.unwrap();
        assert_eq!(labels(&found), vec!["coffee", "lunch"]);

        let found = repo.find(Comparison::Lt, &money(1, 0, "EUR")).await.unwrap();
        assert!(found.is_empty());

        let found = repo.find(Comparison::Ge, &money(1, 0, "EUR")).await.unwrap();
        assert_eq!(labels(&found), vec!["hotel"]);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let repo = setup_repo().await;

        let id = RecordId::new();
        sqlx::query("INSERT INTO money_records (id, label, amount, amount_currency) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind("broken")
            .bind("1,99")
            .bind("GBP")
            .execute(repo.pool())
            .await
            .unwrap();

        let result = repo.get(id).await;
        assert!(matches!(
            result,
            Err(RepoError::Money(MoneyError::ParseError(_)))
        ));
    }

    #[tokio::test]
    async fn test_build_repo() {
        let repo = crate::build_repo("sqlite::memory:").await.unwrap();
        assert_eq!(repo.column().currency_column(), Some("amount_currency"));
    }
}
