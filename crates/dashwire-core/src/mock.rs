// ── Mock widget payloads ──
//
// Placeholder data served when neither a fresh cache entry nor a network
// response is available. Each payload must pass its widget's schema.

use serde_json::{Value, json};

/// Stock mock payload for a built-in widget, `None` for any other id.
pub fn builtin_mock(widget_id: &str) -> Option<Value> {
    let value = match widget_id {
        "research-progress" => json!({
            "papersRead": 24,
            "notesCreated": 47,
            "goalsCompleted": 3,
            "goalsTotal": 5,
            "researchAccuracy": 87,
            "weeklyTrend": [
                { "date": "2024-11-18", "value": 5 },
                { "date": "2024-11-19", "value": 8 },
                { "date": "2024-11-20", "value": 6 },
                { "date": "2024-11-21", "value": 9 },
                { "date": "2024-11-22", "value": 11 },
                { "date": "2024-11-23", "value": 7 },
                { "date": "2024-11-24", "value": 8 }
            ],
            "period": "month",
            "chartType": "line"
        }),
        "quick-stats" => json!({
            "totalPapers": 156,
            "totalNotes": 487,
            "totalWords": 45230,
            "totalReadTime": 3240,
            "avgReadTime": 20.8,
            "avgNoteLength": 92.8,
            "stats": [
                { "label": "Papers", "value": 156, "unit": "total" },
                { "label": "Notes", "value": 487, "unit": "total" },
                { "label": "Words", "value": "45.2K", "unit": "total" }
            ]
        }),
        "recent-papers" => json!({
            "papers": [
                {
                    "id": "1",
                    "title": "Machine Learning in Academic Research",
                    "authors": ["Smith, J.", "Johnson, A."],
                    "publicationDate": "2024-11-15",
                    "readAt": "2024-11-24T09:15:00Z",
                    "notes": 5,
                    "status": "completed"
                },
                {
                    "id": "2",
                    "title": "Advances in Natural Language Processing",
                    "authors": ["Lee, M."],
                    "publicationDate": "2024-11-10",
                    "readAt": "2024-11-23T16:40:00Z",
                    "notes": 3,
                    "status": "completed"
                }
            ],
            "count": 2,
            "total": 156
        }),
        "writing-goals" => json!({
            "goals": [
                {
                    "id": "1",
                    "title": "Thesis Chapter 1",
                    "targetWords": 5000,
                    "currentWords": 3200,
                    "status": "active",
                    "priority": "high",
                    "progress": 64
                }
            ],
            "totalGoals": 5,
            "completedGoals": 3,
            "activeGoals": 2
        }),
        "collaboration" => json!({
            "teamMembers": [
                { "id": "1", "name": "Alice Smith", "role": "Advisor", "status": "active" },
                { "id": "2", "name": "Bob Johnson", "role": "Peer Reviewer", "status": "idle" }
            ],
            "totalMembers": 2,
            "activeNow": 1
        }),
        "calendar" => json!({
            "events": [
                {
                    "id": "1",
                    "title": "Thesis Submission Deadline",
                    "date": "2024-12-15",
                    "type": "deadline"
                },
                {
                    "id": "2",
                    "title": "Committee Meeting",
                    "date": "2024-12-01",
                    "time": "14:00",
                    "type": "meeting"
                }
            ],
            "upcomingCount": 2
        }),
        "trends" => json!({
            "trends": [
                { "id": "1", "topic": "AI Ethics", "mentions": 156, "trend": 15 },
                { "id": "2", "topic": "Climate Science", "mentions": 142, "trend": 8 }
            ],
            "totalTopics": 2,
            "risingCount": 1
        }),
        "notes" => json!({
            "notes": [
                {
                    "id": "1",
                    "title": "Research Notes on ML",
                    "preview": "Key findings about machine learning in education...",
                    "createdAt": "2024-11-24T10:30:00Z",
                    "tags": ["ml", "education"]
                }
            ],
            "totalNotes": 23,
            "pinnedNotes": 2
        }),
        "citations" => json!({
            "citations": [
                { "format": "APA", "count": 45 },
                { "format": "MLA", "count": 28 },
                { "format": "Chicago", "count": 12 }
            ],
            "totalCitations": 85
        }),
        "suggestions" => json!({
            "suggestions": [
                {
                    "id": "1",
                    "title": "Recommended Paper",
                    "source": "AI",
                    "relevance": 92,
                    "type": "paper"
                }
            ],
            "totalSuggestions": 1,
            "acceptedCount": 0
        }),
        "time-tracker" => json!({
            "categories": [
                { "name": "Research", "minutes": 240, "percentage": 40 },
                { "name": "Writing", "minutes": 180, "percentage": 30 },
                { "name": "Review", "minutes": 180, "percentage": 30 }
            ],
            "totalMinutes": 600
        }),
        "custom" => json!({
            "title": "Custom Widget",
            "html": "<div>Custom content</div>"
        }),
        _ => return None,
    };
    Some(value)
}

/// Mock for an id nobody registered.
pub fn empty_mock() -> Value {
    Value::Object(serde_json::Map::new())
}
