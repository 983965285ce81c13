//! Visual prompt construction for generator-style providers.

/// Keyword-to-scene mapping used to turn a topic/narration pair into a
/// text-to-video prompt.
const VISUAL_KEYWORDS: &[(&str, &str)] = &[
    ("ai", "futuristic AI holographic interface, neural networks glowing"),
    ("productivity", "modern workspace, productivity dashboard, efficient workflow"),
    ("automation", "robotic systems, automated processes, smart technology"),
    ("business", "professional office, growth charts, successful entrepreneurs"),
    ("technology", "cutting-edge tech, sleek interfaces, innovation"),
    ("coding", "code editor syntax highlighting, developer workspace"),
    ("design", "creative design studio, graphic elements, artistic workspace"),
    ("marketing", "social media analytics, viral content, engagement graphs"),
    ("money", "cash flow, profit charts rising, wealth building"),
];

const DEFAULT_SCENE: &str = "modern digital workspace, innovative technology";

/// Build a text-to-video prompt from the topic and narration. The first
/// keyword hit wins; otherwise a neutral scene is used.
pub fn build_visual_prompt(topic: &str, narration: &str) -> String {
    let topic_lower = topic.to_lowercase();
    let narration_lower = narration.to_lowercase();

    let scene = VISUAL_KEYWORDS
        .iter()
        .find(|(keyword, _)| {
            topic_lower.contains(keyword) || narration_lower.contains(keyword)
        })
        .map(|(_, scene)| *scene)
        .unwrap_or(DEFAULT_SCENE);

    format!("{}, cinematic lighting, professional 4k, smooth motion", scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_from_topic() {
        let prompt = build_visual_prompt("AI tools", "some narration");
        assert!(prompt.starts_with("futuristic AI holographic interface"));
        assert!(prompt.ends_with("smooth motion"));
    }

    #[test]
    fn test_keyword_match_from_narration() {
        let prompt = build_visual_prompt("weekly update", "tips to grow your business fast");
        assert!(prompt.contains("professional office"));
    }

    #[test]
    fn test_default_scene() {
        let prompt = build_visual_prompt("gardening", "how to prune roses");
        assert!(prompt.starts_with(DEFAULT_SCENE));
    }
}
