//! Domain invalidation wrappers. Mutating handlers call these synchronously
//! before responding success.

use uuid::Uuid;

use crate::cache::service::ResponseCache;
use crate::cache::store::{CacheStats, CacheTag};

impl ResponseCache {
    /// Job lists, job details, employer grids (they show open-job counts) and
    /// application lists.
    pub async fn clear_job_caches(&self) -> usize {
        self.invalidate(&[CacheTag::Jobs, CacheTag::Employers, CacheTag::Applications])
            .await
    }

    pub async fn clear_job_cache(&self, job_id: Uuid) -> usize {
        self.invalidate(&[CacheTag::Job(job_id)]).await
    }

    pub async fn clear_candidate_application_caches(&self) -> usize {
        self.invalidate(&[CacheTag::Applications]).await
    }

    /// Employer grids, plus that employer's own entries when an id is given.
    pub async fn clear_employer_caches(&self, employer_id: Option<Uuid>) -> usize {
        match employer_id {
            Some(id) => {
                self.invalidate(&[CacheTag::Employers, CacheTag::Employer(id)])
                    .await
            }
            None => self.invalidate(&[CacheTag::Employers]).await,
        }
    }

    pub async fn clear_employer_grid_caches(&self) -> usize {
        self.invalidate(&[CacheTag::Employers]).await
    }

    pub async fn clear_all_caches(&self) -> usize {
        self.clear().await
    }

    pub async fn cache_stats(&self) -> Option<CacheStats> {
        self.stats().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cache::keys;

    const TTL: Duration = Duration::from_secs(60);

    async fn seeded(job_id: Uuid, employer_id: Uuid, candidate_id: Uuid) -> ResponseCache {
        let cache = ResponseCache::in_memory();
        cache
            .set(&keys::job_list(&"page=1"), &1, TTL, &[CacheTag::Jobs])
            .await;
        cache
            .set(
                &keys::job_detail(job_id),
                &2,
                TTL,
                &[CacheTag::Jobs, CacheTag::Job(job_id)],
            )
            .await;
        cache
            .set(&keys::employer_grid(&"page=1"), &3, TTL, &[CacheTag::Employers])
            .await;
        cache
            .set(
                &keys::employer_detail(employer_id),
                &4,
                TTL,
                &[CacheTag::Employer(employer_id)],
            )
            .await;
        cache
            .set(
                &keys::candidate_applications(candidate_id),
                &5,
                TTL,
                &[CacheTag::Applications],
            )
            .await;
        cache
    }

    #[tokio::test]
    async fn test_clear_job_caches_spares_employer_detail() {
        let (job, employer, candidate) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let cache = seeded(job, employer, candidate).await;

        assert_eq!(cache.clear_job_caches().await, 4);
        assert_eq!(cache.get::<u32>(&keys::job_detail(job)).await, None);
        assert_eq!(cache.get::<u32>(&keys::candidate_applications(candidate)).await, None);
        assert_eq!(cache.get::<u32>(&keys::employer_detail(employer)).await, Some(4));
    }

    #[tokio::test]
    async fn test_clear_single_job_cache() {
        let (job, employer, candidate) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let cache = seeded(job, employer, candidate).await;

        assert_eq!(cache.clear_job_cache(Uuid::new_v4()).await, 0);
        assert_eq!(cache.clear_job_cache(job).await, 1);
        assert_eq!(cache.get::<u32>(&keys::job_list(&"page=1")).await, Some(1));
    }

    #[tokio::test]
    async fn test_clear_employer_caches_with_and_without_id() {
        let (job, employer, candidate) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let cache = seeded(job, employer, candidate).await;

        assert_eq!(cache.clear_employer_caches(None).await, 1);
        assert_eq!(cache.get::<u32>(&keys::employer_detail(employer)).await, Some(4));
        assert_eq!(cache.clear_employer_caches(Some(employer)).await, 1);
        assert_eq!(cache.get::<u32>(&keys::employer_detail(employer)).await, None);
    }

    #[tokio::test]
    async fn test_clear_employer_grid_and_application_caches() {
        let (job, employer, candidate) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let cache = seeded(job, employer, candidate).await;

        assert_eq!(cache.clear_employer_grid_caches().await, 1);
        assert_eq!(cache.clear_candidate_application_caches().await, 1);
        let stats = cache.cache_stats().await.unwrap();
        assert_eq!(stats.total_entries, 3);
    }

    #[tokio::test]
    async fn test_clear_all_caches() {
        let cache = seeded(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()).await;
        assert_eq!(cache.clear_all_caches().await, 5);
        assert_eq!(cache.cache_stats().await.unwrap().total_entries, 0);
    }
}
