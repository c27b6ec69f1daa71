//! Prompt text sent to the generative models.

use crate::gateway::TransformRequest;

/// Asks the vision model for a short description of the current outfit
pub const ANALYZE_PROMPT: &str = "Describe the clothing this person is wearing in one short phrase \
(for example: \"a blue denim jacket over a white t-shirt\"). Reply with the phrase only.";

/// Prefix turning a free-text custom prompt into an instruction
pub const CUSTOM_PROMPT_PREFIX: &str = "Change my outfit to: ";

/// Instruction for the image model
pub fn transform_prompt(request: &TransformRequest) -> String {
    let mut prompt = format!(
        "The person in this photo is currently wearing {}. {} \
Keep the person's face, identity, hair, body shape and pose exactly the same. \
Only change the clothing, and make it look photorealistic with natural lighting.",
        request.base_description.trim(),
        request.prompt.trim(),
    );

    if request.blur_background {
        prompt.push_str(" Blur the background with a soft, professional bokeh portrait effect.");
    }

    prompt
}

/// Instruction for the video model
pub fn animate_prompt(style_name: &str) -> String {
    format!(
        "A cinematic fashion film of this person showing off their {} outfit. \
Slow, elegant camera movement, subtle natural motion, the fabric moving realistically, \
runway lighting. Keep the person's face and outfit unchanged.",
        style_name
    )
}
