//! Per-turn prompt construction.
//!
//! Pure text assembly: no I/O, deterministic for a given set of inputs.

/// Builds the instruction text sent to the provider for one persona turn.
///
/// The opening turn (the very first of the whole run) asks the persona to
/// state an opinion on `topic`; every later turn embeds the previous turn's
/// content verbatim and asks the persona to respond to it. `previous` is
/// ignored on the opening turn.
pub fn build_role_prompt(
    role: &str,
    topic: &str,
    word_limit: u32,
    opening: bool,
    previous: Option<&str>,
) -> String {
    let mut prompt = format!(
        "You are now playing the role of {role}. Respond entirely in {role}'s \
         identity, tone, professional background, and personality."
    );

    if opening {
        prompt.push_str(&format!(
            "\n\nShare your view on the following topic: \"{topic}\""
        ));
    } else {
        let previous = previous.unwrap_or_default();
        prompt.push_str(&format!(
            "\n\nThe other speaker just said: \"{previous}\"\n\nRespond to \
             their view as {role}."
        ));
    }

    prompt.push_str(&format!(
        "\n\nResponse requirements:\n\
         1. Stay completely true to {role}'s identity and character\n\
         2. Keep the response within {word_limit} characters\n\
         3. Use a natural tone, like a real conversation\n\
         4. Do not add any commentary before or after the response\n\
         5. Speak directly in the first person"
    ));

    prompt
}
