//! Prompt text sent to the model.

/// Persona and task for the image analysis request.
pub const CONSULTANT_PROMPT: &str = "You are a knowledgeable agricultural consultant with expertise in plant diseases and organic \
farming solutions. Your experience spans over 15 years, focusing on providing comprehensive information \
about various diseases, their stages, and prevention methods, particularly in the context of organic practices. \
Your task is to provide detailed information about a specific plant disease, including its name, stage, prevention \
methods, and both chemical and organic solutions. The branding of Kaustubh Agri Organic should be seamlessly integrated \
into your response, emphasizing its products and solutions. ";

pub const DEFAULT_LANGUAGE: &str = "english";

pub fn is_default_language(language: &str) -> bool {
    language.trim().eq_ignore_ascii_case(DEFAULT_LANGUAGE)
}

/// Prompt asking for five farmer questions about an analysis, one per line.
pub fn follow_up_prompt(analysis_text: &str, language: &str) -> String {
    let language_line = if is_default_language(language) {
        String::new()
    } else {
        format!("Respond in {} language.", language.trim())
    };

    format!(
        "Based on the following information about a crop disease, generate 5 related questions that a farmer might ask to learn more about the disease or its treatment:\n\n\
         {}\n\n\
         Format the output as a simple list of questions, one per line.\n\
         {}",
        analysis_text, language_line
    )
}

/// Additional instruction that scopes a re-analysis to one follow-up question.
pub fn question_instruction(question: &str) -> String {
    format!(
        "Answer the following question about the crop disease: \"{}\"",
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_up_prompt_embeds_text() {
        let prompt = follow_up_prompt("Early blight on tomato", "english");
        assert!(prompt.contains("generate 5 related questions"));
        assert!(prompt.contains("Early blight on tomato"));
        assert!(!prompt.contains("Respond in"));
    }

    #[test]
    fn follow_up_prompt_adds_language() {
        let prompt = follow_up_prompt("Leaf rust", "Marathi");
        assert!(prompt.ends_with("Respond in Marathi language."));

        let prompt = follow_up_prompt("Leaf rust", "English");
        assert!(!prompt.contains("Respond in"));
    }

    #[test]
    fn question_instruction_quotes_question() {
        assert_eq!(
            question_instruction("How often should fungicide be applied?"),
            "Answer the following question about the crop disease: \"How often should fungicide be applied?\""
        );
    }

    #[test]
    fn consultant_prompt_carries_branding() {
        assert!(CONSULTANT_PROMPT.contains("Kaustubh Agri Organic"));
    }
}
