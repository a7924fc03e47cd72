// Schemas of the stock dashboard widgets.

use crate::schema::{Rule, WidgetSchema};

pub(super) const BUILTIN_WIDGETS: [&str; 12] = [
    "research-progress",
    "quick-stats",
    "recent-papers",
    "writing-goals",
    "collaboration",
    "calendar",
    "trends",
    "notes",
    "citations",
    "suggestions",
    "time-tracker",
    "custom",
];

pub(super) fn schema(widget_id: &str) -> Option<WidgetSchema> {
    let schema = match widget_id {
        "research-progress" => research_progress(),
        "quick-stats" => quick_stats(),
        "recent-papers" => recent_papers(),
        "writing-goals" => writing_goals(),
        "collaboration" => collaboration(),
        "calendar" => calendar(),
        "trends" => trends(),
        "notes" => notes(),
        "citations" => citations(),
        "suggestions" => suggestions(),
        "time-tracker" => time_tracker(),
        "custom" => custom(),
        _ => return None,
    };
    Some(schema)
}

// ── Shared shapes ────────────────────────────────────────────────────

fn trend_point() -> Rule {
    Rule::object(
        WidgetSchema::new()
            .required("date", Rule::string())
            .required("value", Rule::number())
            .optional("label", Rule::string()),
    )
}

fn stat_card() -> Rule {
    Rule::object(
        WidgetSchema::new()
            .required("label", Rule::string())
            .required("value", Rule::NumberOrString)
            .optional("unit", Rule::string())
            .optional("trend", Rule::number())
            .optional("color", Rule::string()),
    )
}

fn time_range() -> Rule {
    Rule::one_of(&["day", "week", "month"])
}

// ── Widgets ──────────────────────────────────────────────────────────

fn research_progress() -> WidgetSchema {
    WidgetSchema::new()
        .optional("papersRead", Rule::number())
        .optional("notesCreated", Rule::number())
        .optional("goalsCompleted", Rule::number())
        .optional("goalsTotal", Rule::number())
        .optional("weeklyTrend", Rule::list_of(trend_point()))
        .optional("monthlyTrend", Rule::list_of(trend_point()))
        .optional("researchAccuracy", Rule::percentage())
        .optional("period", Rule::one_of(&["week", "month", "year"]))
        .optional("chartType", Rule::one_of(&["line", "bar", "area"]))
}

fn quick_stats() -> WidgetSchema {
    WidgetSchema::new()
        .optional("totalPapers", Rule::number())
        .optional("totalNotes", Rule::number())
        .optional("totalWords", Rule::number())
        .optional("totalReadTime", Rule::number())
        .optional("avgReadTime", Rule::number())
        .optional("avgNoteLength", Rule::number())
        .optional("stats", Rule::list_of(stat_card()))
        .optional("lastUpdated", Rule::string())
}

fn recent_papers() -> WidgetSchema {
    let paper = WidgetSchema::new()
        .required("id", Rule::string())
        .required("title", Rule::string())
        .required("authors", Rule::list_of(Rule::string()))
        .optional("publicationDate", Rule::string())
        .optional("url", Rule::url())
        .optional("abstract", Rule::string())
        .optional("readAt", Rule::datetime())
        .optional("notes", Rule::number())
        .optional("status", Rule::one_of(&["reading", "completed", "saved"]));

    WidgetSchema::new()
        .optional("papers", Rule::list_of(Rule::object(paper)))
        .optional("count", Rule::number())
        .optional("sortBy", Rule::one_of(&["date", "title", "authors"]))
        .optional("total", Rule::number())
}

fn writing_goals() -> WidgetSchema {
    let goal = WidgetSchema::new()
        .required("id", Rule::string())
        .required("title", Rule::string())
        .optional("description", Rule::string())
        .optional("targetWords", Rule::number())
        .optional("currentWords", Rule::number())
        .optional("targetDate", Rule::string())
        .optional("status", Rule::one_of(&["active", "completed", "abandoned"]))
        .optional("priority", Rule::one_of(&["low", "medium", "high"]))
        .optional("progress", Rule::percentage());

    WidgetSchema::new()
        .optional("goals", Rule::list_of(Rule::object(goal)))
        .optional("totalGoals", Rule::number())
        .optional("completedGoals", Rule::number())
        .optional("activeGoals", Rule::number())
}

fn collaboration() -> WidgetSchema {
    let member = WidgetSchema::new()
        .required("id", Rule::string())
        .required("name", Rule::string())
        .optional("email", Rule::email())
        .optional("avatar", Rule::url())
        .optional("role", Rule::string())
        .optional("status", Rule::one_of(&["active", "idle", "offline"]))
        .optional("lastSeen", Rule::datetime());

    let activity = WidgetSchema::new()
        .required("userId", Rule::string())
        .required("action", Rule::string())
        .required("timestamp", Rule::datetime());

    WidgetSchema::new()
        .optional("teamMembers", Rule::list_of(Rule::object(member)))
        .optional("totalMembers", Rule::number())
        .optional("activeNow", Rule::number())
        .optional("pendingInvites", Rule::list_of(Rule::string()))
        .optional("recentActivity", Rule::list_of(Rule::object(activity)))
}

fn calendar() -> WidgetSchema {
    let event = WidgetSchema::new()
        .required("id", Rule::string())
        .required("title", Rule::string())
        .optional("description", Rule::string())
        .required("date", Rule::string())
        .optional("time", Rule::string())
        .optional("endTime", Rule::string())
        .optional(
            "type",
            Rule::one_of(&["deadline", "meeting", "reminder", "milestone"]),
        )
        .optional("color", Rule::string())
        .optional("completed", Rule::Boolean);

    let next_event = WidgetSchema::new()
        .required("title", Rule::string())
        .required("date", Rule::string());

    WidgetSchema::new()
        .optional("events", Rule::list_of(Rule::object(event)))
        .optional("upcomingCount", Rule::number())
        .optional("overdueCount", Rule::number())
        .optional("nextEvent", Rule::object(next_event))
}

fn trends() -> WidgetSchema {
    let trend = WidgetSchema::new()
        .required("id", Rule::string())
        .required("topic", Rule::string())
        .required("mentions", Rule::number())
        .required("trend", Rule::number())
        .optional("color", Rule::string())
        .optional("category", Rule::string());

    WidgetSchema::new()
        .optional("trends", Rule::list_of(Rule::object(trend)))
        .optional("timeRange", time_range())
        .optional("totalTopics", Rule::number())
        .optional("risingCount", Rule::number())
        .optional("fallingCount", Rule::number())
        .optional("chart", Rule::list_of(trend_point()))
}

fn notes() -> WidgetSchema {
    let note = WidgetSchema::new()
        .required("id", Rule::string())
        .required("title", Rule::string())
        .required("preview", Rule::string())
        .optional("content", Rule::string())
        .required("createdAt", Rule::datetime())
        .optional("updatedAt", Rule::datetime())
        .optional("tags", Rule::list_of(Rule::string()))
        .optional("color", Rule::string())
        .optional("pinned", Rule::Boolean);

    WidgetSchema::new()
        .optional("notes", Rule::list_of(Rule::object(note)))
        .optional("totalNotes", Rule::number())
        .optional("pinnedNotes", Rule::number())
        .optional("recentCount", Rule::number())
}

fn citations() -> WidgetSchema {
    let style = WidgetSchema::new()
        .required("format", Rule::string())
        .required("count", Rule::number())
        .optional("examples", Rule::list_of(Rule::string()));

    let recent = WidgetSchema::new()
        .required("citation", Rule::string())
        .required("date", Rule::datetime())
        .required("format", Rule::string());

    WidgetSchema::new()
        .optional("citations", Rule::list_of(Rule::object(style)))
        .optional("totalCitations", Rule::number())
        .optional("mostUsed", Rule::string())
        .optional("recentlyAdded", Rule::list_of(Rule::object(recent)))
}

fn suggestions() -> WidgetSchema {
    let suggestion = WidgetSchema::new()
        .required("id", Rule::string())
        .required("title", Rule::string())
        .optional("description", Rule::string())
        .required("source", Rule::string())
        .required("relevance", Rule::percentage())
        .optional(
            "type",
            Rule::one_of(&["paper", "topic", "goal", "collaborator"]),
        )
        .optional("accepted", Rule::Boolean);

    WidgetSchema::new()
        .optional("suggestions", Rule::list_of(Rule::object(suggestion)))
        .optional("totalSuggestions", Rule::number())
        .optional("acceptedCount", Rule::number())
        .optional("rejectedCount", Rule::number())
}

fn time_tracker() -> WidgetSchema {
    let category = WidgetSchema::new()
        .required("name", Rule::string())
        .required("minutes", Rule::number())
        .required("percentage", Rule::percentage())
        .optional("color", Rule::string());

    WidgetSchema::new()
        .optional("categories", Rule::list_of(Rule::object(category)))
        .optional("totalMinutes", Rule::number())
        .optional("sessionCount", Rule::number())
        .optional("averageSessionLength", Rule::number())
        .optional("longestSession", Rule::number())
        .optional("timeRange", time_range())
}

fn custom() -> WidgetSchema {
    WidgetSchema::new()
        .required("title", Rule::string())
        .optional("html", Rule::string())
        .optional("css", Rule::string())
        .optional("javascript", Rule::string())
        .optional("data", Rule::Record)
        .optional("height", Rule::number())
        .optional("width", Rule::number())
}
