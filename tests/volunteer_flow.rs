use chrono::NaiveDate;

use helping_hands_server::db::in_memory_pool;
use helping_hands_server::models::{Actor, EventDraft, JoinOutcome, NewUser, Role};
use helping_hands_server::services::DomainService;
use helping_hands_server::utils::error::AppError;

async fn sign_up(service: &DomainService, name: &str, email: &str, role: Role) -> Actor {
    let user = service
        .register(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: format!("{}-password", name),
            role,
        })
        .await
        .unwrap();
    Actor::from(&user)
}

fn beach_cleanup() -> EventDraft {
    EventDraft {
        title: "Beach Cleanup".to_string(),
        description: "Collect plastic along the shore".to_string(),
        location: "Santa Monica".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    }
}

#[tokio::test]
async fn ngo_event_lifecycle_with_a_volunteer() {
    let service = DomainService::new(in_memory_pool().await.unwrap());
    let ngo = sign_up(&service, "Shore Trust", "ngo@x.org", Role::Ngo).await;
    let volunteer = sign_up(&service, "Vera", "v@x.org", Role::Volunteer).await;

    let event = service.create_event(&ngo, beach_cleanup()).await.unwrap();

    let listed = service.browse_events().await.unwrap();
    assert_eq!(listed, vec![event.clone()]);

    assert_eq!(
        service.join_event(&volunteer, event.id).await.unwrap(),
        JoinOutcome::Joined
    );

    let volunteers = service.event_volunteers(&ngo, event.id).await.unwrap();
    assert_eq!(volunteers.into_iter().collect::<Vec<_>>(), ["v@x.org"]);

    service.delete_event(&ngo, event.id).await.unwrap();

    assert!(service.joined_events(&volunteer).await.unwrap().is_empty());
    assert!(service.browse_events().await.unwrap().is_empty());
    assert!(matches!(
        service.event_volunteers(&ngo, event.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn deleting_an_event_releases_every_volunteer() {
    let service = DomainService::new(in_memory_pool().await.unwrap());
    let ngo = sign_up(&service, "Shore Trust", "ngo@x.org", Role::Ngo).await;
    let doomed = service.create_event(&ngo, beach_cleanup()).await.unwrap();
    let mut survivor_draft = beach_cleanup();
    survivor_draft.title = "Park Planting".to_string();
    let survivor = service.create_event(&ngo, survivor_draft).await.unwrap();

    let mut volunteers = Vec::new();
    for i in 0..4 {
        let v = sign_up(&service, &format!("v{}", i), &format!("v{}@x.org", i), Role::Volunteer).await;
        service.join_event(&v, doomed.id).await.unwrap();
        service.join_event(&v, survivor.id).await.unwrap();
        volunteers.push(v);
    }

    service.delete_event(&ngo, doomed.id).await.unwrap();

    for v in &volunteers {
        let joined = service.joined_events(v).await.unwrap();
        assert_eq!(joined, vec![survivor.clone()]);
    }
    let summaries = service.my_events(&ngo).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].registrant_count, 4);
}

#[tokio::test]
async fn login_after_registration_uses_normalized_email() {
    let service = DomainService::new(in_memory_pool().await.unwrap());
    sign_up(&service, "Vera", "Vera@Example.org", Role::Volunteer).await;

    let user = service
        .authenticate(helping_hands_server::models::Credentials {
            email: "vera@example.ORG".to_string(),
            password: "Vera-password".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.email, "vera@example.org");
    assert_eq!(user.role, Role::Volunteer);
}
