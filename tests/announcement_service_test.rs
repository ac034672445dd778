mod common;

use std::sync::Arc;

use staffboard::{
    domain::{Announcement, CreateAnnouncementRequest, User, UserRole},
    error::{AppError, ErrorKind},
    repository::SqliteAnnouncementRepository,
    service::announcement_service::AnnouncementService,
};
use uuid::Uuid;

fn request(title: &str, content: &str) -> CreateAnnouncementRequest {
    CreateAnnouncementRequest {
        title: title.to_string(),
        content: content.to_string(),
        author_id: None,
        author_name: None,
    }
}

async fn post(service: &AnnouncementService, author: &User, title: &str) -> Announcement {
    service
        .create(author, request(title, "Body"))
        .await
        .expect("Failed to create announcement")
}

fn assert_pinned_first(list: &[Announcement]) {
    let first_unpinned = list.iter().position(|a| !a.pinned).unwrap_or(list.len());
    assert!(
        list[first_unpinned..].iter().all(|a| !a.pinned),
        "pinned announcement found after an unpinned one"
    );
    for group in [&list[..first_unpinned], &list[first_unpinned..]] {
        assert!(group.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}

#[tokio::test]
async fn superadmin_creates_and_pins_policy_update() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let ctx = common::test_context(pool.clone());
    let service = &ctx.announcement_service;
    let superadmin = common::provision(&pool, "Sam Super", UserRole::Superadmin).await;
    let admin = common::provision(&pool, "Alex Admin", UserRole::Admin).await;

    post(service, &admin, "Older news").await;
    post(service, &admin, "Other news").await;

    let created = service
        .create(&superadmin, request("Policy Update", "New WFH policy"))
        .await?;
    assert!(!created.pinned);
    assert_eq!(created.author_id, superadmin.id);
    assert_eq!(created.author_name, "Sam Super");

    post(service, &admin, "Newest news").await;

    service.set_pinned(&superadmin, created.id, true).await?;

    let list = service.list().await?;
    assert_eq!(list.len(), 4);
    assert_eq!(list[0].id, created.id);
    assert!(list[0].pinned);
    assert_pinned_first(&list);

    let titles: Vec<_> = list.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Policy Update", "Newest news", "Other news", "Older news"]);

    Ok(())
}

#[tokio::test]
async fn pinned_always_precede_unpinned() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let ctx = common::test_context(pool.clone());
    let service = &ctx.announcement_service;
    let admin = common::provision(&pool, "Alex Admin", UserRole::Admin).await;

    let mut created = Vec::new();
    for i in 0..6 {
        created.push(post(service, &admin, &format!("Item {}", i)).await);
    }
    for a in created.iter().step_by(2) {
        service.set_pinned(&admin, a.id, true).await?;
    }

    let list = service.list().await?;
    assert_pinned_first(&list);
    assert_eq!(list.iter().filter(|a| a.pinned).count(), 3);

    // Unpinning drops it back into the unpinned group
    service.set_pinned(&admin, created[0].id, false).await?;
    let list = service.list().await?;
    assert_pinned_first(&list);
    assert_eq!(list.iter().filter(|a| a.pinned).count(), 2);

    Ok(())
}

#[tokio::test]
async fn set_pinned_is_idempotent() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let ctx = common::test_context(pool.clone());
    let service = &ctx.announcement_service;
    let admin = common::provision(&pool, "Alex Admin", UserRole::Admin).await;
    let announcement = post(service, &admin, "Pin me").await;

    let first = service.set_pinned(&admin, announcement.id, true).await?;
    let second = service.set_pinned(&admin, announcement.id, true).await?;
    assert_eq!(first, second);
    assert!(second.pinned);

    let list = service.list().await?;
    assert_eq!(list, vec![second]);

    Ok(())
}

#[tokio::test]
async fn blank_title_or_content_is_invalid() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let ctx = common::test_context(pool.clone());
    let service = &ctx.announcement_service;
    let admin = common::provision(&pool, "Alex Admin", UserRole::Admin).await;

    for (title, content) in [("", "nonempty"), ("   ", "nonempty"), ("Title", "\n\t ")] {
        let err = service.create(&admin, request(title, content)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{:?}/{:?}", title, content);
    }

    let too_long = "x".repeat(201);
    let err = service.create(&admin, request(&too_long, "Body")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    assert!(service.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn stored_fields_are_trimmed() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let ctx = common::test_context(pool.clone());
    let admin = common::provision(&pool, "Alex Admin", UserRole::Admin).await;

    let created = ctx.announcement_service
        .create(&admin, request("  Lunch  ", "\nPizza at noon\n"))
        .await?;
    assert_eq!(created.title, "Lunch");
    assert_eq!(created.content, "Pizza at noon");

    Ok(())
}

#[tokio::test]
async fn employee_cannot_create_or_pin() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let ctx = common::test_context(pool.clone());
    let service = &ctx.announcement_service;
    let employee = common::provision(&pool, "Erin Employee", UserRole::Employee).await;
    let admin = common::provision(&pool, "Alex Admin", UserRole::Admin).await;

    let err = service.create(&employee, request("T", "C")).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // Authorization is checked before input validation
    let err = service.create(&employee, request("", "")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let announcement = post(service, &admin, "Admins only").await;
    let err = service.set_pinned(&employee, announcement.id, true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    // Unknown ids do not leak existence to callers who cannot pin
    let err = service.set_pinned(&employee, Uuid::new_v4(), true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    assert!(!service.list().await?[0].pinned);
    Ok(())
}

#[tokio::test]
async fn cannot_post_as_someone_else() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let ctx = common::test_context(pool.clone());
    let admin = common::provision(&pool, "Alex Admin", UserRole::Admin).await;
    let other = common::provision(&pool, "Olive Other", UserRole::Superadmin).await;

    let err = ctx.announcement_service
        .create(&admin, CreateAnnouncementRequest {
            author_id: Some(other.id),
            ..request("T", "C")
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let created = ctx.announcement_service
        .create(&admin, CreateAnnouncementRequest {
            author_id: Some(admin.id),
            author_name: Some(admin.name.clone()),
            ..request("T", "C")
        })
        .await?;
    assert_eq!(created.author_id, admin.id);

    Ok(())
}

#[tokio::test]
async fn pinning_unknown_announcement_is_not_found() {
    let pool = common::test_pool().await;
    let ctx = common::test_context(pool.clone());
    let admin = common::provision(&pool, "Alex Admin", UserRole::Admin).await;

    let err = ctx.announcement_service
        .set_pinned(&admin, Uuid::new_v4(), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

fn tracked_service(pool: &sqlx::SqlitePool) -> (Arc<AnnouncementService>, Arc<common::InFlight>) {
    let in_flight = Arc::new(common::InFlight::default());
    let repo = common::Tracked::new(SqliteAnnouncementRepository::new(pool.clone()), in_flight.clone());
    (Arc::new(AnnouncementService::new(Arc::new(repo))), in_flight)
}

#[tokio::test]
async fn concurrent_pins_on_one_announcement_are_linearized() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (service, in_flight) = tracked_service(&pool);
    let admin = Arc::new(common::provision(&pool, "Alex Admin", UserRole::Admin).await);
    let announcement = post(&service, &admin, "Contended").await;

    let id = announcement.id;
    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        let admin = admin.clone();
        handles.push(tokio::spawn(async move {
            service.set_pinned(&admin, id, i % 2 == 0).await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await??);
    }

    // Each pin read the announcement only after the previous one finished
    assert_eq!(in_flight.peak_per_entity(), 1);
    assert!(results.iter().all(|a| a.id == id));

    let list = service.list().await?;
    assert_eq!(list.len(), 1);

    Ok(())
}

#[tokio::test]
async fn pins_on_different_announcements_run_in_parallel() -> anyhow::Result<()> {
    let pool = common::test_pool().await;
    let (service, in_flight) = tracked_service(&pool);
    let admin = Arc::new(common::provision(&pool, "Alex Admin", UserRole::Admin).await);

    let mut ids = Vec::new();
    for title in ["First", "Second", "Third"] {
        ids.push(post(&service, &admin, title).await.id);
    }

    let mut handles = Vec::new();
    for id in ids {
        let service = service.clone();
        let admin = admin.clone();
        handles.push(tokio::spawn(async move {
            service.set_pinned(&admin, id, true).await
        }));
    }

    for handle in handles {
        assert!(handle.await??.pinned);
    }

    assert_eq!(in_flight.peak_per_entity(), 1);
    assert!(in_flight.peak_total() > 1);

    Ok(())
}
