// Generation: quota gate, complexity templates, image call, usage recording.
// The image API is reached only through image_client.

pub mod handlers;
pub mod pricing;
pub mod prompts;
pub mod quota;
pub mod usage_cache;
pub mod workflow;
