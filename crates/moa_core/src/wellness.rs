//! Guided exercises offered alongside the conversation.

/// Step-by-step instructions for the 4-4-4-4 breathing exercise.
pub fn guided_breathing() -> &'static [&'static str] {
    &[
        "Welcome to this guided breathing exercise. Find a comfortable position.",
        "1. Breathe in slowly through your nose for 4 counts...",
        "2. Hold your breath gently for 4 counts...",
        "3. Exhale slowly through your mouth for 4 counts...",
        "4. Pause for 4 counts...",
        "5. Repeat this cycle 4 more times...",
        "6. Notice how you feel more relaxed with each breath...",
        "Well done! Remember you can do this exercise anytime you need to calm down.",
    ]
}
