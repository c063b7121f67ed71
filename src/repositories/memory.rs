use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sea_orm::DbErr;

use super::{
    ArticlesRepository, CrudRepository, HelpRequestRepository, MenuItemReviewRepository,
    RecommendationRequestRepository, Record, UserRepository,
};
use crate::database::models::{
    articles, help_request, menu_item_review, recommendation_request, user,
};

/// One invocation against an [`InMemoryRepository`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepositoryCall {
    FindAll,
    FindById(i64),
    /// Id of the record as handed to `save` (0 for inserts).
    Save(i64),
    DeleteById(i64),
    Finder(&'static str),
}

struct Store<M> {
    rows: BTreeMap<i64, M>,
    next_id: i64,
    calls: Vec<RepositoryCall>,
    saved: Vec<M>,
}

/// Map-backed repository used when no database is configured, and as a test double.
///
/// Every call is journaled so callers can check exactly what reached storage.
pub struct InMemoryRepository<M> {
    store: Mutex<Store<M>>,
}

impl<M: Record> Default for InMemoryRepository<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Record> InMemoryRepository<M> {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                rows: BTreeMap::new(),
                next_id: 1,
                calls: Vec::new(),
                saved: Vec::new(),
            }),
        }
    }

    /// Puts rows in place without journaling; ids of 0 get assigned.
    pub fn seed(&self, records: impl IntoIterator<Item = M>) -> Vec<M> {
        let mut store = self.lock();
        records
            .into_iter()
            .map(|record| store.put(record))
            .collect()
    }

    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.lock().calls.clone()
    }

    /// Records passed to `save`, in call order, as they were received.
    pub fn saved(&self) -> Vec<M> {
        self.lock().saved.clone()
    }

    pub fn count(&self, call: &RepositoryCall) -> usize {
        self.lock().calls.iter().filter(|c| *c == call).count()
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Store<M>> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn filter_rows<F>(&self, finder: &'static str, predicate: F) -> Vec<M>
    where
        F: Fn(&M) -> bool,
    {
        let mut store = self.lock();
        store.calls.push(RepositoryCall::Finder(finder));
        store
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

impl<M: Record> Store<M> {
    fn put(&mut self, mut record: M) -> M {
        if record.id() == 0 {
            record.set_id(self.next_id);
        }
        self.next_id = self.next_id.max(record.id() + 1);
        self.rows.insert(record.id(), record.clone());
        record
    }
}

#[async_trait]
impl<M: Record> CrudRepository<M> for InMemoryRepository<M> {
    async fn find_all(&self) -> Result<Vec<M>, DbErr> {
        let mut store = self.lock();
        store.calls.push(RepositoryCall::FindAll);
        Ok(store.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<M>, DbErr> {
        let mut store = self.lock();
        store.calls.push(RepositoryCall::FindById(id));
        Ok(store.rows.get(&id).cloned())
    }

    async fn save(&self, record: M) -> Result<M, DbErr> {
        let mut store = self.lock();
        store.calls.push(RepositoryCall::Save(record.id()));
        store.saved.push(record.clone());
        Ok(store.put(record))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbErr> {
        let mut store = self.lock();
        store.calls.push(RepositoryCall::DeleteById(id));
        store.rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl HelpRequestRepository for InMemoryRepository<help_request::Model> {
    async fn find_all_by_requester_email(
        &self,
        requester_email: &str,
    ) -> Result<Vec<help_request::Model>, DbErr> {
        Ok(self.filter_rows("find_all_by_requester_email", |row| {
            row.requester_email == requester_email
        }))
    }
}

#[async_trait]
impl ArticlesRepository for InMemoryRepository<articles::Model> {
    async fn find_all_by_email(&self, email: &str) -> Result<Vec<articles::Model>, DbErr> {
        Ok(self.filter_rows("find_all_by_email", |row| row.email == email))
    }
}

#[async_trait]
impl MenuItemReviewRepository for InMemoryRepository<menu_item_review::Model> {
    async fn find_all_by_item_id(
        &self,
        item_id: i64,
    ) -> Result<Vec<menu_item_review::Model>, DbErr> {
        Ok(self.filter_rows("find_all_by_item_id", |row| row.item_id == item_id))
    }
}

#[async_trait]
impl RecommendationRequestRepository for InMemoryRepository<recommendation_request::Model> {
    async fn find_all_by_requester_email(
        &self,
        requester_email: &str,
    ) -> Result<Vec<recommendation_request::Model>, DbErr> {
        Ok(self.filter_rows("find_all_by_requester_email", |row| {
            row.requester_email == requester_email
        }))
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<user::Model> {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        Ok(self
            .filter_rows("find_by_email", |row| row.email == email)
            .into_iter()
            .next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(item_id: i64, stars: i32) -> menu_item_review::Model {
        menu_item_review::Model {
            id: 0,
            item_id,
            reviewer_email: "reviewer@ucsb.edu".to_string(),
            stars,
            date_reviewed: "2022-01-03T00:00:00".parse().unwrap(),
            comments: "fine".to_string(),
        }
    }

    #[tokio::test]
    async fn first_save_assigns_sequential_ids() {
        let repo = InMemoryRepository::new();
        let first = repo.save(review(1, 4)).await.unwrap();
        let second = repo.save(review(2, 3)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.calls(), vec![RepositoryCall::Save(0), RepositoryCall::Save(0)]);
        assert_eq!(repo.saved()[0].id, 0);
    }

    #[tokio::test]
    async fn saving_an_existing_id_overwrites_in_place() {
        let repo = InMemoryRepository::new();
        let stored = repo.seed([review(1, 4)]).remove(0);

        let mut edited = review(9, 1);
        edited.id = stored.id;
        repo.save(edited.clone()).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.find_by_id(stored.id).await.unwrap(), Some(edited));
    }

    #[tokio::test]
    async fn seeded_ids_push_the_sequence_forward() {
        let repo = InMemoryRepository::new();
        let mut explicit = review(1, 5);
        explicit.id = 40;
        repo.seed([explicit]);

        let next = repo.save(review(2, 2)).await.unwrap();
        assert_eq!(next.id, 41);
    }

    #[tokio::test]
    async fn delete_removes_the_row_and_is_journaled() {
        let repo = InMemoryRepository::new();
        let stored = repo.seed([review(1, 4)]).remove(0);

        repo.delete_by_id(stored.id).await.unwrap();

        assert!(repo.is_empty());
        assert_eq!(repo.count(&RepositoryCall::DeleteById(stored.id)), 1);
    }

    #[tokio::test]
    async fn item_finder_only_returns_matching_reviews() {
        let repo = InMemoryRepository::new();
        repo.seed([review(1, 4), review(2, 3), review(1, 1)]);

        let found = repo.find_all_by_item_id(1).await.unwrap();
        assert_eq!(found.iter().map(|r| r.stars).collect::<Vec<_>>(), vec![4, 1]);
        assert_eq!(repo.calls(), vec![RepositoryCall::Finder("find_all_by_item_id")]);
    }
}
