//! Built-in vocabulary and scenarios

use super::model::{Difficulty, Scenario, VocabularyItem};

/// Words for negotiating an auto rickshaw fare
pub fn auto_negotiation_words() -> Vec<VocabularyItem> {
    vec![
        VocabularyItem::new("price_inquiry", "How much?", "ಎಷ್ಟು ಆಗುತ್ತೆ?", "Eshtu aagutte?"),
        VocabularyItem::new("too_expensive", "Too expensive", "ಹೆಚ್ಚು ಆಗಿದೆ", "Hecchu aagide"),
        VocabularyItem::new("reduce_please", "Reduce please", "ಕಡಿಮೆ ಮಾಡಿ", "Kadime maadi"),
        VocabularyItem::new("okay_agreed", "Okay", "ಸರಿ", "Sari"),
        VocabularyItem::new(
            "forum_to_koramangala",
            "Forum Mall to Koramangala",
            "ಫೋರಂ ಮಾಲ್‌ನಿಂದ ಕೊರಮಂಗಲಕ್ಕೆ",
            "Forum mall nindu Koramangalakke",
        ),
        VocabularyItem::new("meter_please", "By meter please", "ಮೀಟರ್ ಇಟ್ಟು ಹೋಗಿ", "Meter ittu hogi"),
    ]
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "auto_negotiation".to_string(),
            title: "Auto Negotiation".to_string(),
            description: "Learn to negotiate auto rickshaw fares in Koramangala traffic"
                .to_string(),
            location: "Koramangala, Bangalore".to_string(),
            difficulty: Difficulty::Beginner,
            prerequisite_words: [
                "price_inquiry",
                "too_expensive",
                "reduce_please",
                "okay_agreed",
                "forum_to_koramangala",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            estimated_minutes: 25,
            unlocked: true,
            completed: false,
        },
        Scenario {
            id: "restaurant_ordering".to_string(),
            title: "Restaurant Ordering".to_string(),
            description: "Order food confidently at local Bangalore restaurants".to_string(),
            location: "Brigade Road, Bangalore".to_string(),
            difficulty: Difficulty::Beginner,
            prerequisite_words: Vec::new(),
            estimated_minutes: 30,
            unlocked: false,
            completed: false,
        },
        Scenario {
            id: "market_shopping".to_string(),
            title: "Market Shopping".to_string(),
            description: "Bargain like a local at Russell Market".to_string(),
            location: "Russell Market, Bangalore".to_string(),
            difficulty: Difficulty::Intermediate,
            prerequisite_words: Vec::new(),
            estimated_minutes: 35,
            unlocked: false,
            completed: false,
        },
    ]
}
