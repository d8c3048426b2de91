/// Provider payload contract tests
///
/// Exercises the wire shapes the sync flows rely on, using captured-style
/// fixtures for each provider. The structs here mirror the deserialization
/// contract: if a fixture stops parsing, a provider assumption has drifted.
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

const LISTING_FIXTURE: &str = r#"{
  "locations": [
    {
      "name": "accounts/106/locations/2882",
      "title": "Chez Marcel",
      "categories": {
        "primaryCategory": {
          "name": "categories/gcid:french_restaurant",
          "displayName": "French restaurant",
          "serviceTypes": [
            { "serviceTypeId": "job_type_id:lunch", "displayName": "Lunch" },
            { "serviceTypeId": "job_type_id:dinner", "displayName": "Dinner" }
          ]
        }
      }
    }
  ]
}"#;

const REVIEWS_FIXTURE: &str = r#"{
  "reviews": [
    {
      "reviewId": "rev-100",
      "reviewer": {
        "displayName": "Ana",
        "profilePhotoUrl": "https://lh3.example.com/ana.png"
      },
      "starRating": "FOUR",
      "comment": "Great food, slow service.",
      "createTime": "2024-01-15T18:30:00Z"
    },
    {
      "reviewId": "rev-101",
      "reviewer": { "displayName": "Ben" },
      "starRating": "FIVE",
      "comment": "Perfect.",
      "reviewReply": { "comment": "Thank you!" }
    }
  ]
}"#;

const MEDIA_FIXTURE: &str = r#"{
  "id": "1789",
  "caption": "New menu this week",
  "media_type": "IMAGE",
  "media_url": "https://cdn.example.com/1789.jpg",
  "timestamp": "2024-01-15T20:03:11+0000",
  "comments": {
    "data": [
      { "id": "c-1", "text": "Looks great", "timestamp": "2024-01-15T20:10:00+0000" },
      { "id": "c-2", "text": "When do you open?", "timestamp": "2024-01-15T21:00:00+0000" }
    ]
  }
}"#;

const DETECTION_FIXTURE: &str = r#"{
  "google": {
    "items": [
      { "label": "Plate", "confidence": 0.93, "x_min": 0.1, "x_max": 0.8, "y_min": 0.2, "y_max": 0.9, "width": 0.7, "height": 0.7 },
      { "label": "Plate", "confidence": 0.51 }
    ]
  },
  "amazon": {
    "items": [
      { "label": "Fork", "confidence": 0.88 }
    ]
  }
}"#;

const CHAT_FIXTURE: &str = r#"{
  "id": "chatcmpl-9xYz",
  "object": "chat.completion",
  "choices": [
    {
      "index": 0,
      "message": {
        "role": "assistant",
        "content": "{\"formal\": \"Thank you for your visit.\", \"friendly\": \"Thanks so much!\", \"emoji\": \"Thanks! 😊\"}"
      },
      "finish_reason": "stop"
    }
  ]
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingFixture {
    locations: Vec<LocationFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationFixture {
    name: String,
    title: String,
    categories: CategoriesFixture,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesFixture {
    primary_category: PrimaryCategoryFixture,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrimaryCategoryFixture {
    name: String,
    display_name: String,
    #[serde(default)]
    service_types: Vec<ServiceTypeFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceTypeFixture {
    service_type_id: String,
    display_name: String,
}

#[test]
fn test_listing_payload_shape() {
    let listing: ListingFixture = serde_json::from_str(LISTING_FIXTURE).unwrap();
    let location = &listing.locations[0];

    assert_eq!(location.title, "Chez Marcel");
    // The provider-scoped location id is the last path segment of `name`
    assert_eq!(location.name.rsplit('/').next().unwrap(), "2882");

    let category = &location.categories.primary_category;
    assert!(category.name.starts_with("categories/gcid:"));
    assert_eq!(
        category.name.strip_prefix("categories/gcid:").unwrap(),
        "french_restaurant"
    );
    assert_eq!(category.display_name, "French restaurant");

    assert_eq!(category.service_types.len(), 2);
    assert_eq!(
        category.service_types[0]
            .service_type_id
            .trim_start_matches("job_type_id:"),
        "lunch"
    );
    assert_eq!(category.service_types[1].display_name, "Dinner");
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewsFixture {
    reviews: Vec<ReviewFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewFixture {
    review_id: String,
    #[serde(default)]
    reviewer: ReviewerFixture,
    #[serde(default)]
    star_rating: String,
    #[serde(default)]
    comment: String,
    review_reply: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewerFixture {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    profile_photo_url: String,
}

#[test]
fn test_reviews_payload_shape() {
    let payload: ReviewsFixture = serde_json::from_str(REVIEWS_FIXTURE).unwrap();
    assert_eq!(payload.reviews.len(), 2);

    let first = &payload.reviews[0];
    assert_eq!(first.review_id, "rev-100");
    assert_eq!(first.reviewer.display_name, "Ana");
    assert_eq!(first.star_rating, "FOUR");
    assert!(first.review_reply.is_none());

    // A reply marks the review as answered; the reply body itself is opaque
    let second = &payload.reviews[1];
    assert!(second.review_reply.is_some());
    // Reviewer photo is optional on the wire
    assert_eq!(second.reviewer.profile_photo_url, "");
}

#[derive(Debug, Deserialize)]
struct MediaFixture {
    id: String,
    #[serde(default)]
    caption: String,
    media_type: String,
    media_url: String,
    timestamp: String,
    comments: Option<CommentsFixture>,
}

#[derive(Debug, Deserialize)]
struct CommentsFixture {
    data: Vec<CommentFixture>,
}

#[derive(Debug, Deserialize)]
struct CommentFixture {
    id: String,
    text: String,
    timestamp: String,
}

#[test]
fn test_media_payload_shape() {
    let media: MediaFixture = serde_json::from_str(MEDIA_FIXTURE).unwrap();

    assert_eq!(media.id, "1789");
    assert_eq!(media.media_type, "IMAGE");
    assert!(media.media_url.starts_with("https://"));
    assert_eq!(media.caption, "New menu this week");

    let comments = media.comments.unwrap();
    assert_eq!(comments.data.len(), 2);
    assert_eq!(comments.data[0].id, "c-1");
    assert_eq!(comments.data[1].text, "When do you open?");
}

#[test]
fn test_media_timestamps_use_basic_offsets() {
    // The social provider emits offsets without a colon, which plain RFC 3339
    // parsing rejects
    let media: MediaFixture = serde_json::from_str(MEDIA_FIXTURE).unwrap();

    assert!(DateTime::parse_from_rfc3339(&media.timestamp).is_err());
    let parsed =
        DateTime::parse_from_str(&media.timestamp, "%Y-%m-%dT%H:%M:%S%z").unwrap();
    assert_eq!(parsed.timestamp(), 1705348991);

    for comment in &media.comments.unwrap().data {
        assert!(
            DateTime::parse_from_str(&comment.timestamp, "%Y-%m-%dT%H:%M:%S%z").is_ok(),
            "comment timestamp should parse: {}",
            comment.timestamp
        );
    }
}

#[derive(Debug, Deserialize)]
struct EngineFixture {
    items: Vec<DetectionFixtureItem>,
}

#[derive(Debug, Deserialize)]
struct DetectionFixtureItem {
    label: String,
    confidence: f64,
    x_min: Option<f64>,
    x_max: Option<f64>,
    y_min: Option<f64>,
    y_max: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

#[test]
fn test_detection_payload_shape() {
    let payload: std::collections::HashMap<String, EngineFixture> =
        serde_json::from_str(DETECTION_FIXTURE).unwrap();

    assert_eq!(payload.len(), 2);

    let google = &payload["google"];
    assert_eq!(google.items.len(), 2);
    assert_eq!(google.items[0].label, "Plate");

    // Full bounding boxes carry all six fields; partial ones omit them
    let placed = &google.items[0];
    assert!(placed.x_min.is_some() && placed.x_max.is_some());
    assert!(placed.y_min.is_some() && placed.y_max.is_some());
    assert!(placed.width.is_some() && placed.height.is_some());

    let unplaced = &google.items[1];
    assert!(unplaced.x_min.is_none());
    assert!((unplaced.confidence - 0.51).abs() < f64::EPSILON);

    assert_eq!(payload["amazon"].items[0].label, "Fork");
}

#[derive(Debug, Deserialize)]
struct ChatFixture {
    choices: Vec<ChoiceFixture>,
}

#[derive(Debug, Deserialize)]
struct ChoiceFixture {
    message: ChoiceMessageFixture,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessageFixture {
    content: String,
}

#[test]
fn test_chat_completion_payload_shape() {
    let chat: ChatFixture = serde_json::from_str(CHAT_FIXTURE).unwrap();
    let content = &chat.choices[0].message.content;

    // Structured suggestion output is itself JSON inside the content string
    let suggestions: Value = serde_json::from_str(content).unwrap();
    assert_eq!(
        suggestions["formal"].as_str().unwrap(),
        "Thank you for your visit."
    );
    assert!(suggestions["emoji"].as_str().unwrap().contains('😊'));
}
