use serde::{Deserialize, Serialize};

/// Age-complexity selection. Transient: picks a template, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Simple,
    Medium,
    Detailed,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Simple, Complexity::Medium, Complexity::Detailed];

    pub fn label(self) -> &'static str {
        match self {
            Complexity::Simple => "Simple (ages 3-5)",
            Complexity::Medium => "Medium (ages 6-8)",
            Complexity::Detailed => "Detailed (ages 9+)",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Complexity::Simple => SIMPLE_TEMPLATE,
            Complexity::Medium => MEDIUM_TEMPLATE,
            Complexity::Detailed => DETAILED_TEMPLATE,
        }
    }
}

/// Templates wrap the user's text at `{prompt}`.
const SIMPLE_TEMPLATE: &str = "A very simple coloring page for young children (ages 3-5) of {prompt}. \
    Use the thickest possible bold black outlines on a plain white background, \
    with minimal detail and large open shapes that are easy to color in. \
    Black and white line art only, no shading, no color.";

const MEDIUM_TEMPLATE: &str = "A coloring page for children (ages 6-8) of {prompt}. \
    Use clear, medium-thick black outlines on a plain white background \
    with a moderate amount of detail. \
    Black and white line art only, no shading, no color.";

const DETAILED_TEMPLATE: &str = "A detailed coloring page for older children (ages 9+) of {prompt}. \
    Use clean black outlines on a plain white background with fuller detail, \
    patterns and background elements to color. \
    Outline drawing only, no shading, no color, no gray fills.";

/// Wraps the raw prompt in the template for `complexity`.
pub fn expand_prompt(prompt: &str, complexity: Complexity) -> String {
    complexity.template().replace("{prompt}", prompt)
}
