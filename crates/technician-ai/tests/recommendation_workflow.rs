use std::sync::Arc;

use technician_ai::assignment::roster::load_roster;
use technician_ai::assignment::{
    AssignmentRequest, InMemoryDirectory, RecommendationEngine, RecommendationError, Scorer,
    TechnicianDirectory, TechnicianId,
};

const ROSTER: &str = "\
technician_id,display_name,email,specialization,rating,is_available,total_bookings,completed_bookings,current_workload,review_average
tech-101,Hana Said,hana@example.com,\"brakes, suspension\",4.4,true,25,23,1,4.6
tech-102,Adel Ramy,adel@example.com,engine,4.9,true,60,57,0,4.9
tech-103,Samir Fathy,samir@example.com,\"brakes,tires\",4.8,false,80,78,0,4.9
tech-104,Nour Ali,nour@example.com,,3.9,yes,,,3,
";

fn brakes_request(priority: &str) -> AssignmentRequest {
    serde_json::from_value(serde_json::json!({
        "booking_id": 501,
        "services": [
            { "service_id": 1, "service_name": "Brake inspection", "category": "brakes" }
        ],
        "scheduled_date": "2025-11-03 08:30:00",
        "priority": priority
    }))
    .expect("snake_case payload parses")
}

#[test]
fn csv_roster_feeds_the_recommendation_engine() {
    let directory = load_roster(ROSTER.as_bytes()).expect("roster loads");
    let available = directory
        .list_available_technicians()
        .expect("listing succeeds");
    assert_eq!(available.len(), 3, "unavailable technicians are filtered");

    let engine = RecommendationEngine::new(Arc::new(directory), Scorer::default());
    let booking = brakes_request("Urgent")
        .into_booking()
        .expect("booking valid");

    let recommendation = engine.recommend(&booking).expect("recommendation produced");

    assert_eq!(
        recommendation.recommended_technician_id,
        TechnicianId("tech-101".to_string())
    );
    assert_eq!(recommendation.factors.specialization_match, 0.95);
    assert_eq!(recommendation.alternatives.len(), 2);
    assert!(recommendation
        .alternatives
        .iter()
        .all(|alternative| alternative.confidence <= recommendation.confidence));
    assert!(recommendation
        .alternatives
        .iter()
        .all(|alternative| alternative.technician_id.as_str() != "tech-103"));
}

#[test]
fn demo_roster_prefers_brake_specialists() {
    let engine = RecommendationEngine::new(Arc::new(InMemoryDirectory::demo()), Scorer::default());
    let booking = brakes_request("normal")
        .into_booking()
        .expect("booking valid");

    let recommendation = engine.recommend(&booking).expect("recommendation produced");

    assert_eq!(recommendation.recommended_technician_id.as_str(), "tech-002");
    assert_eq!(recommendation.confidence, 0.92);
    let alternatives: Vec<&str> = recommendation
        .alternatives
        .iter()
        .map(|alternative| alternative.technician_id.as_str())
        .collect();
    assert_eq!(alternatives, vec!["tech-004", "tech-001"]);
}

#[test]
fn recommendation_serializes_for_booking_clients() {
    let engine = RecommendationEngine::new(Arc::new(InMemoryDirectory::demo()), Scorer::default());
    let booking = brakes_request("low").into_booking().expect("booking valid");

    let recommendation = engine.recommend(&booking).expect("recommendation produced");
    let payload = serde_json::to_value(&recommendation).expect("serializes");

    assert_eq!(payload["recommendedTechnicianId"], "tech-002");
    assert!(payload["reason"]
        .as_str()
        .expect("reason present")
        .starts_with("Best match based on"));
    assert_eq!(payload["factors"]["locationProximity"], 0.0);
    assert_eq!(payload["alternatives"].as_array().map(Vec::len), Some(2));
}

#[test]
fn empty_roster_yields_no_recommendation() {
    let roster = "technician_id,display_name\n";
    let directory = load_roster(roster.as_bytes()).expect("header-only roster loads");
    let engine = RecommendationEngine::new(Arc::new(directory), Scorer::default());
    let booking = brakes_request("normal")
        .into_booking()
        .expect("booking valid");

    let err = engine.recommend(&booking).expect_err("nobody to recommend");
    assert!(matches!(err, RecommendationError::NoTechnicians));
}
