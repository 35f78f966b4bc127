use crate::common::TestApp;
use axum::http::StatusCode;
use serde_json::{Value, json};

const DAY: &str = "2025-05-10";

#[tokio::test]
async fn test_health_and_request_id() {
    let app = TestApp::new();

    let response = app.client.get("/health").await;
    response.assert_status(StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = TestApp::new();

    let response = app.client.get("/mga-aralin").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_complete_lesson_creates_due_cards() {
    let app = TestApp::new();
    let user = app.user();

    let response = app
        .client
        .post_json(
            &format!("/users/{user}/lessons/L1/complete"),
            &json!({ "itemIds": ["a", "b"], "today": DAY }),
        )
        .await;
    response.assert_status(StatusCode::OK);

    let json: Value = response.json();
    assert_eq!(json["lessonId"], "L1");
    assert_eq!(json["cardsCreated"], 2);
    assert_eq!(json["totalCards"], 2);
    assert_eq!(json["lessonsCompleted"], 1);
    assert_eq!(json["dayStreak"], 1);

    let response = app
        .client
        .get(&format!("/users/{user}/review/due?today={DAY}"))
        .await;
    response.assert_status(StatusCode::OK);

    let json: Value = response.json();
    assert_eq!(json["total"], 2);
    let cards = json["cards"].as_array().expect("cards should be an array");
    assert_eq!(cards[0]["itemId"], "a");
    assert_eq!(cards[1]["itemId"], "b");
    for card in cards {
        assert_eq!(card["box"], 1);
        assert_eq!(card["nextReviewDate"], DAY);
        assert_eq!(card["lessonId"], "L1");
    }
}

#[tokio::test]
async fn test_complete_lesson_is_idempotent() {
    let app = TestApp::new();
    let user = app.user();
    let uri = format!("/users/{user}/lessons/L1/complete");
    let body = json!({ "itemIds": ["a", "b"], "today": DAY });

    app.client.post_json(&uri, &body).await.assert_status(StatusCode::OK);
    app.client
        .post_json(&format!("/users/{user}/review/a"), &json!({ "correct": true, "today": DAY }))
        .await
        .assert_status(StatusCode::OK);

    let response = app.client.post_json(&uri, &body).await;
    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["cardsCreated"], 0);
    assert_eq!(json["totalCards"], 2);
    assert_eq!(json["lessonsCompleted"], 1);

    // the reviewed card kept its box
    let progress: Value = app
        .client
        .get(&format!("/users/{user}/progress?today={DAY}"))
        .await
        .json();
    assert_eq!(progress["boxes"][1]["cards"], 1);
}

#[tokio::test]
async fn test_complete_lesson_rejects_blank_item_ids() {
    let app = TestApp::new();
    let user = app.user();

    let response = app
        .client
        .post_json(
            &format!("/users/{user}/lessons/L1/complete"),
            &json!({ "itemIds": ["a", "  "] }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_scenario() {
    let app = TestApp::new();
    let user = app.user();

    app.client
        .post_json(
            &format!("/users/{user}/lessons/L1/complete"),
            &json!({ "itemIds": ["a", "b"], "today": "2025-05-10" }),
        )
        .await
        .assert_status(StatusCode::OK);

    let response = app
        .client
        .post_json(
            &format!("/users/{user}/review/a"),
            &json!({ "correct": true, "today": "2025-05-10" }),
        )
        .await;
    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["reviewed"], true);
    assert_eq!(json["outcome"]["previousBox"], 1);
    assert_eq!(json["outcome"]["newBox"], 2);
    assert_eq!(json["card"]["box"], 2);
    assert_eq!(json["card"]["nextReviewDate"], "2025-05-12");
    assert_eq!(json["card"]["correctCount"], 1);
    assert_eq!(json["card"]["lastReviewed"], "2025-05-10");

    // "a" is no longer due on the same day, "b" still is
    let due: Value = app
        .client
        .get(&format!("/users/{user}/review/due?today=2025-05-10"))
        .await
        .json();
    assert_eq!(due["total"], 1);
    assert_eq!(due["cards"][0]["itemId"], "b");

    // due again exactly two days later
    let due: Value = app
        .client
        .get(&format!("/users/{user}/review/due?today=2025-05-12"))
        .await
        .json();
    assert_eq!(due["total"], 2);

    let response = app
        .client
        .post_json(
            &format!("/users/{user}/review/a"),
            &json!({ "correct": false, "today": "2025-05-12" }),
        )
        .await;
    let json: Value = response.json();
    assert_eq!(json["card"]["box"], 1);
    assert_eq!(json["card"]["nextReviewDate"], "2025-05-12");
    assert_eq!(json["card"]["incorrectCount"], 1);

    let progress: Value = app
        .client
        .get(&format!("/users/{user}/progress?today=2025-05-12"))
        .await
        .json();
    assert_eq!(progress["totalReviews"], 2);
    assert_eq!(progress["totalCorrect"], 1);
    assert_eq!(progress["accuracy"], 50);
    assert_eq!(progress["dayStreak"], 1);
    assert_eq!(progress["dueToday"], 2);
}

#[tokio::test]
async fn test_review_unknown_item_is_noop() {
    let app = TestApp::new();
    let user = app.user();

    app.client
        .post_json(
            &format!("/users/{user}/lessons/L1/complete"),
            &json!({ "itemIds": ["a"], "today": DAY }),
        )
        .await
        .assert_status(StatusCode::OK);

    let response = app
        .client
        .post_json(
            &format!("/users/{user}/review/nonexistent"),
            &json!({ "correct": true, "today": DAY }),
        )
        .await;
    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["reviewed"], false);
    assert!(json.get("outcome").is_none());

    let progress: Value = app
        .client
        .get(&format!("/users/{user}/progress?today={DAY}"))
        .await
        .json();
    assert_eq!(progress["totalReviews"], 0);
    assert_eq!(progress["totalCards"], 1);
}

#[tokio::test]
async fn test_due_cards_limit() {
    let app = TestApp::new();
    let user = app.user();

    app.client
        .post_json(
            &format!("/users/{user}/lessons/L1/complete"),
            &json!({ "itemIds": ["a", "b", "c"], "today": DAY }),
        )
        .await
        .assert_status(StatusCode::OK);

    let due: Value = app
        .client
        .get(&format!("/users/{user}/review/due?today={DAY}&limit=2"))
        .await
        .json();
    assert_eq!(due["total"], 3);
    assert_eq!(due["cards"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_due_cards_rejects_bad_date() {
    let app = TestApp::new();
    let user = app.user();

    let response = app
        .client
        .get(&format!("/users/{user}/review/due?today=yesterday"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_users_do_not_share_cards() {
    let app = TestApp::new();
    let alice = app.user();
    let bob = app.user();

    app.client
        .post_json(
            &format!("/users/{alice}/lessons/L1/complete"),
            &json!({ "itemIds": ["a"], "today": DAY }),
        )
        .await
        .assert_status(StatusCode::OK);

    let due: Value = app
        .client
        .get(&format!("/users/{bob}/review/due?today={DAY}"))
        .await
        .json();
    assert_eq!(due["total"], 0);

    let progress = app.state.progress_for(alice).load_progress();
    assert_eq!(progress.review_cards.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reviews_are_all_counted() {
    let app = TestApp::new();
    let user = app.user();

    app.client
        .post_json(
            &format!("/users/{user}/lessons/L1/complete"),
            &json!({ "itemIds": ["a"], "today": DAY }),
        )
        .await
        .assert_status(StatusCode::OK);

    let uri = format!("/users/{user}/review/a");
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = app.client.clone();
            let uri = uri.clone();
            tokio::spawn(async move {
                client
                    .post_json(&uri, &json!({ "correct": true, "today": DAY }))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle
            .await
            .expect("review task panicked")
            .assert_status(StatusCode::OK);
    }

    let progress = app.state.progress_for(user).load_progress();
    assert_eq!(progress.total_reviews, 8);
    assert_eq!(progress.card("a").unwrap().correct_count, 8);
    assert_eq!(progress.card("a").unwrap().leitner_box.get(), 5);
    assert_eq!(app.state.active_user_locks(), 0);
}
