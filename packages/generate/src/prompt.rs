/// System instruction sent with every request.
///
/// The current code is embedded so "change the button color" style prompts
/// have something to work on.
pub fn system_instruction(current_code: &str) -> String {
    let context = if current_code.is_empty() {
        "No existing code."
    } else {
        current_code
    };

    format!(
        "You are an expert frontend developer and UI designer.\n\
         Generate valid, modern HTML, CSS (Tailwind via CDN or inline styles) and JavaScript for the user's request.\n\
         \n\
         Rules:\n\
         1. Output a single, complete HTML file.\n\
         2. If the user asks to modify existing code, return the full updated code.\n\
         3. Include <script src=\"https://cdn.tailwindcss.com\"></script> when styling is needed, unless told otherwise.\n\
         4. Keep the design responsive and accessible.\n\
         5. Do NOT use markdown code blocks. Return ONLY the raw code.\n\
         6. If the user asks a question, answer inside HTML comments or a visible HTML element.\n\
         \n\
         Current Code Context:\n\
         {}\n",
        context
    )
}

/// Remove ```` ```html ```` / ```` ``` ```` markers the model may add anyway,
/// then trim surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "").replace("```", "").trim().to_string()
}
