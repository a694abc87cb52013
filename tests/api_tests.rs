mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{build_test_app, get, post_json, send};

#[tokio::test]
async fn test_health_check() {
    let (status, json) = send(build_test_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = build_test_app();
    let resp = tower::ServiceExt::oneshot(app, get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_fee_quote() {
    let body = json!({
        "amount": "1000",
        "price": "0.05",
        "direction": "buy",
        "has_referrer": false,
        "vibe_staked": "1000",
        "hand_discount_percent": "0"
    });
    let (status, json) = send(build_test_app(), post_json("/api/fees/quote", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let data = &json["data"];
    assert_eq!(data["stake_tier"], "gold");
    assert_eq!(data["direction"], "buy");
    assert_eq!(data["platform_fee"].as_str().unwrap().parse::<f64>().unwrap(), 0.175);
    assert_eq!(data["total"].as_str().unwrap().parse::<f64>().unwrap(), 50.325);
    assert!(data["next_stake_tier"].is_null());
}

#[tokio::test]
async fn test_fee_quote_rejects_negative_price() {
    let body = json!({
        "amount": "10",
        "price": "-1",
        "direction": "sell"
    });
    let (status, json) = send(build_test_app(), post_json("/api/fees/quote", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "price must be positive");
}

#[tokio::test]
async fn test_fee_quote_rejects_oversized_trade() {
    let body = json!({
        "amount": "79228162514264337593543950335",
        "price": "2",
        "direction": "buy"
    });
    let (status, json) = send(build_test_app(), post_json("/api/fees/quote", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "amount × price is too large");
}

#[tokio::test]
async fn test_fee_quote_rejects_malformed_body() {
    let body = json!({ "amount": "10", "direction": "sideways" });
    let (status, json) = send(build_test_app(), post_json("/api/fees/quote", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_fee_schedule() {
    let (status, json) = send(build_test_app(), get("/api/fees/schedule")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total_fee_bps"], 100);
    assert_eq!(json["data"]["stake_tiers"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_level_table() {
    let (status, json) = send(build_test_app(), get("/api/levels")).await;
    assert_eq!(status, StatusCode::OK);
    let table = json["data"].as_array().unwrap();
    assert_eq!(table.len(), 50);
    assert_eq!(table[49]["total_xp_required"], 54_250);
    assert_eq!(table[0]["tier"], "Novice");
}

#[tokio::test]
async fn test_resolve_level() {
    let (status, json) = send(build_test_app(), get("/api/levels/450")).await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["level"], 4);
    assert_eq!(data["current_xp"], 50);
    assert_eq!(data["tier"], "Novice");
    assert_eq!(data["xp_to_next_level"], 50);
    assert_eq!(data["next_level"]["level"], 5);
}

#[tokio::test]
async fn test_resolve_level_one_progress() {
    let (status, json) = send(build_test_app(), get("/api/levels/100")).await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["level"], 1);
    assert_eq!(data["xp_to_next_level"], 100);
    assert_eq!(data["progress"].as_str().unwrap().parse::<f64>().unwrap(), 50.0);
}

#[tokio::test]
async fn test_resolve_level_rejects_non_numeric_xp() {
    let (status, json) = send(build_test_app(), get("/api/levels/lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_resolve_prestige_level() {
    let (_, json) = send(build_test_app(), get("/api/levels/64250")).await;
    let data = &json["data"];
    assert_eq!(data["level"], 50);
    assert_eq!(data["prestige"], 1);
    assert!(data["next_level"].is_null());
}

#[tokio::test]
async fn test_evolution_round_trip() {
    let body = json!({
        "token": { "id": "tok_vibe", "price": "12", "score": "72" },
        "holding": {
            "buy_price": "1",
            "hold_days": 31,
            "observed_at": "2026-03-01T12:00:00Z"
        }
    });
    let (status, json) = send(build_test_app(), post_json("/api/evolution", body)).await;
    assert_eq!(status, StatusCode::OK);

    let state = json["data"].clone();
    assert_eq!(state["base_rank"], "10");
    assert_eq!(state["evolved_rank"], "K");
    assert_eq!(state["rank_change"], 3);
    assert_eq!(state["effect"], "golden");
    assert_eq!(state["gradient"]["from"], "#fbbf24");
    let history_len = state["evolution_history"].as_array().unwrap().len();
    assert_eq!(history_len, 4);

    // Feed the state back: nothing new should be recorded
    let mut previous = state.clone();
    previous.as_object_mut().unwrap().remove("gradient");
    let body = json!({
        "token": { "id": "tok_vibe", "price": "12", "score": "72" },
        "holding": {
            "buy_price": "1",
            "hold_days": 31,
            "observed_at": "2026-03-02T12:00:00Z",
            "previous": previous
        }
    });
    let (status, json) = send(build_test_app(), post_json("/api/evolution", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"]["evolution_history"].as_array().unwrap().len(),
        history_len
    );
    assert_eq!(json["data"]["badges"], state["badges"]);
}

#[tokio::test]
async fn test_evolution_rejects_zero_buy_price() {
    let body = json!({
        "token": { "id": "tok_vibe", "price": "12", "score": "72" },
        "holding": { "buy_price": "0", "hold_days": 3 }
    });
    let (status, json) = send(build_test_app(), post_json("/api/evolution", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "buy_price must be positive");
}

#[tokio::test]
async fn test_evolution_rejects_dust_buy_price() {
    let body = json!({
        "token": { "id": "tok_vibe", "price": "79000000000000000000000000000", "score": "72" },
        "holding": { "buy_price": "0.0000000001", "hold_days": 3 }
    });
    let (status, json) = send(build_test_app(), post_json("/api/evolution", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "price / buy_price is too large");
}

#[tokio::test]
async fn test_evolution_rejects_dust_all_time_low() {
    let body = json!({
        "token": { "id": "tok_vibe", "price": "1000", "score": "72" },
        "holding": {
            "buy_price": "79000000000000000000000000000",
            "all_time_low": "0.0000000001",
            "hold_days": 3
        }
    });
    let (status, json) = send(build_test_app(), post_json("/api/evolution", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "buy_price / all_time_low is too large");
}

#[tokio::test]
async fn test_collection_sets() {
    let (status, json) = send(build_test_app(), get("/api/collections/sets")).await;
    assert_eq!(status, StatusCode::OK);
    let sets = json["data"].as_array().unwrap();
    assert!(sets.iter().any(|s| s["id"] == "full_deck"));
}

#[tokio::test]
async fn test_collection_stats() {
    let body = json!({
        "holdings": [
            { "token_id": "gpt", "symbol": "GPT", "category": "ai", "rank": "A", "suit": "spades", "value": "400" },
            { "token_id": "vibe", "symbol": "VIBE", "category": "ai", "rank": "7", "suit": "hearts", "value": "50" },
            { "token_id": "claw", "symbol": "CLAW", "category": "ai", "rank": "3", "suit": "hearts", "value": "25" }
        ],
        "hold_days": { "gpt": 12 },
        "max_multiple": "12",
        "survived_dumps": 0
    });
    let (status, json) = send(build_test_app(), post_json("/api/collections/stats", body)).await;
    assert_eq!(status, StatusCode::OK);

    let data = &json["data"];
    assert_eq!(data["completed_sets"], 2);
    assert_eq!(data["collection_score"], 330);
    assert_eq!(data["collection_rank"], "Adept");
    assert_eq!(data["titles"], json!(["Collector", "AI Pioneer"]));
}

#[tokio::test]
async fn test_collection_stats_rejects_overflowing_value() {
    let body = json!({
        "holdings": [
            { "token_id": "a", "symbol": "A", "category": "ai", "rank": "A", "suit": "spades", "value": "79228162514264337593543950335" },
            { "token_id": "b", "symbol": "B", "category": "ai", "rank": "2", "suit": "hearts", "value": "79228162514264337593543950335" }
        ]
    });
    let (status, json) = send(build_test_app(), post_json("/api/collections/stats", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "total holding value is too large");
}

#[tokio::test]
async fn test_unknown_collection_set() {
    let (status, json) = send(build_test_app(), get("/api/collections/sets/no_such_set")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "collection set no_such_set");
}

#[tokio::test]
async fn test_collection_set_detail() {
    let (status, json) = send(build_test_app(), get("/api/collections/sets/royal_court")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["requirements"][0]["type"], "rank_at_least");
    assert_eq!(json["data"]["requirements"][0]["rank"], "J");
    let rewards = json["data"]["rewards"].as_array().unwrap();
    assert!(rewards.contains(&json!({ "type": "card_back", "value": "royal" })));
}
