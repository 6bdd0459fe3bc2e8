// Oracle prompt templates. Placeholders are `{name}` and are filled by `fill_template`.

pub const ANALYSIS_SYSTEM: &str = "\
You are a recruiting analyst made of three cooperating reviewers: a strict hard-skills \
reviewer, a semantic-fit reviewer and a bias-and-fairness reviewer. \
You MUST respond with a single valid JSON object that follows the schema you are given. \
No markdown fences, no commentary.";

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Score the candidate below against the job description.

JOB DESCRIPTION
Title: {title}
Company: {company}
Experience level: {experience_level}
Required skills: {required_skills}
Preferred skills: {preferred_skills}
Description:
{description}

CANDIDATE RESUME TEXT
{resume_text}

HOW TO SCORE (all scores are 0-100)
1. Hard skills: exact skill, certification and technical requirement matches. Be strict.
   Fill matched_skills, missing_skills and hard_skills_score.
2. Semantic fit: look past keywords at experience relevance, project impact and context.
   Fill inferred_skills, experience_relevance, education_fit, projects_impact and
   semantic_fit_score. For relevance_heatmap_data, split the resume into meaningful
   snippets (role descriptions, project details, key sentences), copy each snippet
   VERBATIM from the resume text, list them in the order they appear in the resume,
   and give each a relevance score with a short reason.
3. Bias and fairness: find bias indicators (age, gendered language, names, photos,
   nationality and similar). Fill bias_flags and bias_score (lower means less risk).
   Produce debiased_text: the resume with those details replaced by placeholders such
   as [REDACTED_NAME] or [REDACTED_DATE].

Combine the three into overall_score, recommendations and a detailed_analysis summary.

{fairness_instruction}

RESPONSE JSON SCHEMA
{schema}
"#;

pub const EXTRACTION_SYSTEM: &str = "\
You are a precise resume parser. Extract structured candidate data from resume text. \
You MUST respond with valid JSON only, no markdown fences, no explanations. \
Leave a field out rather than guessing it.";

pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the candidate's details from the resume text below.

RESUME TEXT
{resume_text}

RESPONSE JSON SCHEMA
{schema}
"#;

pub const IMAGE_EXTRACTION_PROMPT_TEMPLATE: &str = r#"The attached image is a resume. Extract the candidate's details from it.
Transcribe all of the resume's readable text, in reading order, into extracted_text.

RESPONSE JSON SCHEMA
{schema}
"#;
