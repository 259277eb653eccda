use std::time::Duration;

use client_core::{AppController, ControllerConfig, PageSnapshot, SessionStore};
use data_providers::Providers;
use shared::{
    domain::{CropFilter, LoginField, Page},
    protocol::{ImageFile, UserAction},
};

async fn run(controller: &std::sync::Arc<AppController>, actions: Vec<UserAction>) {
    for action in actions {
        controller.dispatch(action).await.expect("action accepted");
    }
}

#[tokio::test(start_paused = true)]
async fn farmer_walks_through_every_page() {
    let latency = Duration::from_millis(250);
    let session = SessionStore::new();
    let controller = AppController::new(
        ControllerConfig::default().with_latency(latency),
        Providers::static_data(),
        session.clone(),
    );
    let settle = || tokio::time::sleep(latency * 2);

    run(
        &controller,
        vec![
            UserAction::Navigate {
                path: "/login".into(),
            },
            UserAction::SetLoginField {
                field: LoginField::Identifier,
                value: "9876543210".into(),
            },
            UserAction::SetLoginField {
                field: LoginField::Password,
                value: "kisan123".into(),
            },
            UserAction::SubmitLogin,
        ],
    )
    .await;
    settle().await;
    assert_eq!(controller.current_page().await, Page::Dashboard);
    assert!(session.is_authenticated());

    run(
        &controller,
        vec![
            UserAction::OpenFeature {
                title: "Crop Recommendation".into(),
            },
            UserAction::SetFilter {
                field: CropFilter::SoilType,
                value: "clay".into(),
            },
            UserAction::SetFilter {
                field: CropFilter::Region,
                value: "east".into(),
            },
            UserAction::SetFilter {
                field: CropFilter::Season,
                value: "kharif".into(),
            },
            UserAction::RequestRecommendations,
            UserAction::AddToCropPlan {
                crop: "Rice".into(),
            },
            UserAction::Navigate {
                path: "/pest-detection".into(),
            },
            UserAction::UploadImage {
                file: ImageFile {
                    file_name: "tomato-leaf.png".into(),
                    mime_type: Some("image/png".into()),
                    bytes: vec![0x89, b'P', b'N', b'G'],
                },
            },
        ],
    )
    .await;
    settle().await;
    match controller.snapshot().await.view {
        PageSnapshot::PestDetection(pest) => assert!(pest.detection_ready),
        other => panic!("expected pest page, got {other:?}"),
    }

    run(
        &controller,
        vec![
            UserAction::Navigate {
                path: "/advisory".into(),
            },
            UserAction::SendChatMessage {
                text: "When should I plant wheat?".into(),
            },
        ],
    )
    .await;
    settle().await;
    match controller.snapshot().await.view {
        PageSnapshot::Advisory(chat) => assert_eq!(chat.transcript.len(), 3),
        other => panic!("expected advisory page, got {other:?}"),
    }

    controller.navigate("/profile").await;
    let snapshot = controller.snapshot().await;
    let json = serde_json::to_value(&snapshot).expect("snapshot serializes");
    assert_eq!(json["view"]["page"], "profile");
    assert_eq!(json["nav"]["items"][4]["active"], true);
    // Rice is seeded already, so the session entry is not listed twice.
    match snapshot.view {
        PageSnapshot::Profile(profile) => assert_eq!(profile.crop_plan.len(), 3),
        other => panic!("expected profile page, got {other:?}"),
    }

    run(&controller, vec![UserAction::Logout]).await;
    assert_eq!(controller.current_page().await, Page::Landing);
    assert!(!session.is_authenticated());
}

#[test]
fn actions_decode_from_front_end_json() {
    let action: UserAction = serde_json::from_str(
        r#"{"type":"set_filter","payload":{"field":"season","value":"rabi"}}"#,
    )
    .expect("decode");
    assert_eq!(
        action,
        UserAction::SetFilter {
            field: CropFilter::Season,
            value: "rabi".into(),
        }
    );
}
