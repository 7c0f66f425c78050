const FEATURES: [(&str, &str); 4] = [
    (
        "AI scheduling",
        "Let the assistant lay out your day around priorities and deadlines.",
    ),
    (
        "Multimodal input",
        "Add tasks by typing, recording a voice memo or snapping a photo.",
    ),
    (
        "Calendar sync",
        "Keep your schedule in step with Google Calendar and Outlook.",
    ),
    (
        "Smart notifications",
        "Get reminded before things are due, not after.",
    ),
];

/// Landing page. Static, no network.
pub fn render_home() -> String {
    let mut body = String::from("TaskPilot\nYour AI-powered task scheduling assistant\n\n");
    for (name, blurb) in FEATURES {
        body.push_str(&format!("  * {}: {}\n", name, blurb));
    }
    body.push_str("\nGet started:     taskpilot auth login\n");
    body.push_str("View dashboard:  taskpilot dashboard");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_lists_features_and_navigation() {
        let home = render_home();
        for (name, _) in FEATURES {
            assert!(home.contains(name));
        }
        assert!(home.contains("taskpilot auth login"));
        assert!(home.contains("taskpilot dashboard"));
    }
}
