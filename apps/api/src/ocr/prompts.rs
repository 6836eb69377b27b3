// OCR prompt. Sent alongside the image in a single user turn.

pub const OCR_INSTRUCTION: &str =
    "Extract all text from this image and return only the raw text. \
    Preserve the original line breaks. Do not summarize, translate, or add commentary.";
