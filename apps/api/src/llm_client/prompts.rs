// Shared prompt fragments. Each oracle keeps its own prompt templates next to it;
// only cross-cutting pieces live here.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that feeds candidate text to the model.
pub const FAIRNESS_INSTRUCTION: &str = "\
    Judge the candidate only on skills, experience, education and demonstrated impact. \
    Never let name, gender, age, nationality, photo, marital status or similar \
    personal attributes influence any score.";

/// Substitutes `{key}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so resume or job text that happens to
/// contain `{title}` and the like is copied through untouched. Unknown `{…}`
/// sequences are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let matched = values.iter().find(|(key, _)| {
            tail.len() >= key.len() + 2
                && tail[1..].starts_with(key)
                && tail[1 + key.len()..].starts_with('}')
        });
        match matched {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
