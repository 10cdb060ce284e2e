//! Prompt compilation.
//!
//! [`compile`] renders a validated [`GenerationRequest`] into the positive
//! prompt sent to the provider plus the fixed [`NEGATIVE_PROMPT`]. The
//! output depends only on the request, so identical requests always produce
//! byte-identical prompts.

use crate::storyboard::{GenerationRequest, Moment};

/// Policy text appended to every prompt, after the style line.
///
/// Not derived from request data.
pub const POLICY_REQUIREMENTS: &str = "\
- Duration: EXACTLY 8 seconds total
- ENDING: The final scene (7-8 seconds) MUST have a clear, definitive ending:
  * Fade to black starting at 7.5 seconds
  * OR final logo/product reveal with hold
  * OR clear visual conclusion (person walks away, door closes, product placed down)
  * The video must feel COMPLETE, not abruptly cut off
  * Last frame should communicate \"this is the end\"

PHYSICAL & CULTURAL COHERENCE (CRITICAL):
✅ Physical Logic:
   - Bottles/containers MUST be visibly OPEN (cap removed, lid off) when liquid is pouring
   - Show the opening action BEFORE pouring (twist cap, pull tab, remove lid)
   - Objects must be in correct physical states for their actions
   - Respect gravity and physics at all times
   - One logical action per person at a time

✅ Cultural Accuracy:
   - Mate (Argentine tea): Show ONE person drinking, then PASSING to another - NEVER two people drinking from same mate simultaneously
   - Respect cultural practices: proper handling of cultural items, accurate rituals
   - Research and honor cultural context for any cultural products or practices
   - Show authentic, respectful use of cultural items

✅ Logical Action Sequences:
   - Actions must follow natural order: open → pour → drink (NOT pour → open)
   - Cause and effect must be clear and visible
   - Human interactions must be natural and realistic
   - Objects handled correctly (phones right-side up, proper grip, natural movements)

❌ NEVER SHOW:
   - Closed bottles pouring liquid
   - Multiple people using same single-use item simultaneously (mate, straw, etc.)
   - Impossible physics or illogical actions
   - Cultural practices done incorrectly
   - Actions out of sequence (effect before cause)
   - Abrupt endings without visual closure

- Smooth transitions between scenes with natural motion
- Clear, satisfying ending with visual closure (fade out, logo hold, or conclusive action)";

/// Artifacts the provider should avoid. Identical for every request.
pub const NEGATIVE_PROMPT: &str = "blurry, low quality, distorted, warped, deformed, bad anatomy, \
watermark, signature, text artifacts, longer than 8 seconds, extended duration, slow pacing, \
static shots, amateur quality, physical inconsistencies, closed bottles pouring liquid, \
impossible physics, illogical actions, discontinuity errors, cultural inaccuracies, \
multiple people using same single-use item simultaneously, actions out of sequence, \
cause without effect, effect without cause, abrupt ending, incomplete ending, cut-off ending";

/// Positive and negative prompt pair for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt {
    pub positive: String,
    pub negative: String,
}

/// Compile the generation prompts for a request.
pub fn compile(request: &GenerationRequest) -> CompiledPrompt {
    let style = &request.style;
    let storyboard = &request.storyboard;

    let scenes = storyboard
        .moments
        .iter()
        .map(render_moment)
        .collect::<Vec<_>>()
        .join("\n");

    let positive = format!(
        "Create an 8-second {style} commercial for {product}.\n\
         \n\
         SCENES (8 seconds total):\n\
         {scenes}\n\
         \n\
         Audio: {audio}\n\
         Music: {music}\n\
         \n\
         CRITICAL REQUIREMENTS:\n\
         - Style: {style}, cinematic, professional quality\n\
         {policy}",
        product = request.product_description,
        audio = storyboard.audio_strategy,
        music = storyboard.music_style,
        policy = POLICY_REQUIREMENTS,
    );

    CompiledPrompt {
        positive,
        negative: NEGATIVE_PROMPT.to_string(),
    }
}

/// Render one scene block. Each block starts on a fresh line so scenes are
/// separated by a blank line once joined.
fn render_moment(moment: &Moment) -> String {
    format!(
        "\n{}: {}\n{}\nCamera: {}",
        moment.timing, moment.title, moment.description, moment.camera_movement
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
