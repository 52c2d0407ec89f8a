//! Notifications service

use crate::{
    api::notifications::NotificationsApi,
    cache::{QueryCache, QueryKey},
    error::AppResult,
    models::notification::{Notification, NotificationQuery, UnreadCount},
};

pub fn notifications_key() -> QueryKey {
    QueryKey::root("notifications")
}

fn list_key() -> QueryKey {
    notifications_key().child("list")
}

fn unread_key() -> QueryKey {
    notifications_key().child("unread-count")
}

#[derive(Clone)]
pub struct NotificationsService {
    api: NotificationsApi,
    cache: QueryCache,
}

impl NotificationsService {
    pub fn new(api: NotificationsApi, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    pub async fn list(&self, query: &NotificationQuery) -> AppResult<Vec<Notification>> {
        let key = list_key().with_params(query)?;
        self.cache.fetch(key, || self.api.list(query)).await
    }

    pub async fn unread_count(&self) -> AppResult<u64> {
        let count: UnreadCount = self
            .cache
            .fetch(unread_key(), || self.api.unread_count())
            .await?;
        Ok(count.count)
    }

    pub async fn mark_read(&self, public_id: &str) -> AppResult<()> {
        self.cache
            .mutate(
                &notifications_key(),
                |cache| {
                    let mut newly_read = 0;
                    cache.update_matching(&list_key(), |_, items: &mut Vec<Notification>| {
                        for n in items.iter_mut().filter(|n| n.public_id == public_id && !n.is_read) {
                            n.is_read = true;
                            newly_read = 1;
                        }
                    })?;
                    cache.update(&unread_key(), |c: &mut UnreadCount| {
                        c.count = c.count.saturating_sub(newly_read)
                    })?;
                    Ok(())
                },
                self.api.mark_read(public_id),
            )
            .await
    }

    pub async fn mark_all_read(&self) -> AppResult<()> {
        self.cache
            .mutate(
                &notifications_key(),
                |cache| {
                    cache.update_matching(&list_key(), |_, items: &mut Vec<Notification>| {
                        items.iter_mut().for_each(|n| n.is_read = true)
                    })?;
                    cache.update(&unread_key(), |c: &mut UnreadCount| c.count = 0)?;
                    Ok(())
                },
                self.api.mark_all_read(),
            )
            .await
    }

    pub async fn delete(&self, public_id: &str) -> AppResult<()> {
        self.cache
            .mutate(
                &notifications_key(),
                |cache| {
                    cache.update_matching(&list_key(), |_, items: &mut Vec<Notification>| {
                        items.retain(|n| n.public_id != public_id)
                    })?;
                    Ok(())
                },
                self.api.delete(public_id),
            )
            .await
    }
}
