// CV extraction prompt templates.

pub const CV_EXTRACT_SYSTEM: &str = "\
You are an expert CV analyzer. Extract key information from the CV exactly as written. \
Never invent skills, employers or degrees that are not in the document.";

/// CV extraction prompt. Replace `{cv_text}` before sending.
pub const CV_EXTRACT_PROMPT: &str = r#"Extract the key information from the following CV.

CV TEXT:
{cv_text}

Return a JSON object with this EXACT schema:
{
  "skills": ["string"],
  "experience": [{"company": "string", "role": "string", "duration": "string"}],
  "education": [{"degree": "string", "institution": "string", "year": "string"}]
}

RULES:
1. Use empty lists for sections the CV does not contain.
2. "duration" and "year" are free text copied from the CV (e.g. "2019 - 2023", "2018").
3. Return ONLY the JSON object."#;
