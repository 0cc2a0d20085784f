//! Interview questions from job-description keywords

use super::keywords::top_keywords;
use serde::{Deserialize, Serialize};

const FALLBACK_KEYWORD: &str = "the required skill";
const TEMPLATE_COUNT: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub keyword: String,
}

fn render(template: usize, keyword: &str) -> String {
    match template % TEMPLATE_COUNT {
        0 => format!("Can you describe your experience with {} and how you applied it in a project?", keyword),
        1 => format!("What challenges have you faced while working with {} and how did you overcome them?", keyword),
        2 => format!("Explain a scenario where {} improved a business outcome.", keyword),
        3 => format!("How would you approach a task involving {}?", keyword),
        4 => format!("Which tools or libraries do you use with {}, and why?", keyword),
        5 => format!("Give an example of a measurable result you achieved using {}.", keyword),
        _ => format!("How do you keep your knowledge of {} up to date?", keyword),
    }
}

/// `limit` questions cycling through the job's top keywords and the
/// question templates in step
pub fn generate_interview_questions(job_text: &str, limit: usize) -> Vec<InterviewQuestion> {
    let keywords = top_keywords(job_text, 20);

    (0..limit)
        .map(|i| {
            let keyword = if keywords.is_empty() {
                FALLBACK_KEYWORD
            } else {
                keywords[i % keywords.len()].as_str()
            };
            InterviewQuestion {
                question: render(i, keyword),
                keyword: keyword.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_keywords_and_templates() {
        let questions = generate_interview_questions("kubernetes terraform kubernetes", 4);
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].keyword, "kubernetes");
        assert_eq!(questions[1].keyword, "terraform");
        assert!(questions[0].question.starts_with("Can you describe your experience with kubernetes"));
        assert!(questions[3].question.starts_with("How would you approach a task involving"));
    }

    #[test]
    fn test_fallback_keyword() {
        let questions = generate_interview_questions("a an the", 2);
        assert_eq!(questions[0].keyword, FALLBACK_KEYWORD);
        assert_eq!(questions[1].question, render(1, FALLBACK_KEYWORD));
    }

    #[test]
    fn test_zero_limit() {
        assert!(generate_interview_questions("rust", 0).is_empty());
    }
}
