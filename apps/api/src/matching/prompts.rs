// All LLM prompt constants for skill extraction and alignment.

/// System prompt for skill extraction: defines what counts as a skill and demands a bare JSON array.
pub const EXTRACT_SKILLS_SYSTEM: &str = "\
You are an expert recruiter. Extract every DISTINCT skill that could appear in a CV or job post. \
A skill may be a programming language, software, cloud platform, data technology, \
methodology (e.g. scrum), or soft skill (e.g. communication, leadership). Do NOT return:\n\
  - personal names, cities, countries, addresses, emails, phone numbers, URLs\n\
  - generic words like 'professional', 'experience', 'new', 'resume'\n\
Return ONLY a JSON array of lowercase strings. No wrapping object, no extra keys, no prose, \
no markdown code fences.";

/// Prefix for every extraction turn. The text to analyse follows on the next line.
pub const EXTRACT_SKILLS_PREFIX: &str = "Extract skills:\n";

/// Few-shot pairs anchoring output format and precision: (input text, expected reply).
pub const EXTRACT_SKILLS_EXAMPLES: &[(&str, &str)] = &[
    (
        "John Doe – San Francisco CA\n\
         Email: john@x.com • Phone: 555-555\n\
         Senior Data Engineer skilled in Python, Spark, AWS EMR, \
         and orchestration with Airflow. Strong communication skills.",
        r#"["python","spark","aws emr","airflow","communication"]"#,
    ),
    (
        "We need someone who knows Java, Spring Boot, Docker/K8s, \
         CI/CD (GitLab) and agile methodologies.",
        r#"["java","spring boot","docker","k8s","gitlab","ci/cd","agile"]"#,
    ),
];

/// System prompt for skill alignment: the user turn carries the two lists as JSON.
pub const ALIGN_SKILLS_SYSTEM: &str = "\
You are a senior technical recruiter. \
Given two unordered lists of skill tokens, you must:\n\
1. Align semantically-equivalent items (treat synonyms, abbreviations \
and near-synonyms as a match).\n\
2. Count how many required (job) skills are present in the candidate list.\n\
3. Return ONLY a JSON object with keys: matched, missing, score (0-1 float). \
`matched` and `missing` are arrays of job skills; no prose, no markdown code fences.";
