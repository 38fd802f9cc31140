// src/pages/questionnaire.rs

use crate::app::AppContext;
use crate::error::AppError;
use crate::models::questionnaire::{AnswerValue, Question, QuestionType};
use crate::pages::prompt;

/// Step-by-step questionnaire flow. Answers are persisted as they are
/// entered, so an interrupted session resumes where it left off.
pub fn run(ctx: &AppContext) -> Result<(), AppError> {
    if ctx.questionnaire.steps().is_empty() {
        println!("The questionnaire is not available right now.");
        return Ok(());
    }

    loop {
        let Some(step) = ctx.questionnaire.current_step() else {
            // Pointer walked past the last step; hand back to the menu.
            return Ok(());
        };
        let progress = ctx.questionnaire.progress();

        println!();
        println!(
            "Step {}/{}: {}",
            progress.current + 1,
            progress.total,
            step.title
        );
        if !step.description.is_empty() {
            println!("{}", step.description);
        }

        for question in &step.questions {
            ask_question(ctx, question)?;
        }

        let progress = ctx.questionnaire.progress();
        if !progress.is_valid {
            println!("Some required questions are still unanswered.");
            continue;
        }

        if progress.current + 1 >= progress.total {
            println!("All steps complete. Choose 'Review answers' from the menu to submit.");
            return Ok(());
        }

        match prompt("[n]ext step, [b]ack, [m]enu > ")?.as_str() {
            "b" | "B" => {
                let index = ctx.questionnaire.current_step_index();
                ctx.questionnaire.set_current_step(index.saturating_sub(1));
            }
            "m" | "M" => return Ok(()),
            _ => {
                let index = ctx.questionnaire.current_step_index();
                ctx.questionnaire.set_current_step(index + 1);
            }
        }
    }
}

/// Renders one question and records the answer. An empty input keeps the
/// existing answer, if any.
fn ask_question(ctx: &AppContext, question: &Question) -> Result<(), AppError> {
    println!();
    let marker = if question.is_required { " *" } else { "" };
    println!("{}{}", question.question_text, marker);
    if !question.help_text.is_empty() {
        println!("  ({})", question.help_text);
    }
    if let Some(existing) = ctx.questionnaire.answers().get(&question.question_key) {
        println!("  current answer: {}", render_answer(question, existing));
    }

    // Exhaustive over the closed question-type set.
    let answer = match question.question_type {
        QuestionType::Text => ask_text(question)?,
        QuestionType::Number | QuestionType::Range => ask_number(question)?,
        QuestionType::Select | QuestionType::Radio => ask_choice(question)?,
        QuestionType::Checkbox => ask_multi(question)?,
    };

    if let Some(value) = answer {
        ctx.questionnaire
            .update_answer(question.question_key.clone(), value);
    }
    Ok(())
}

fn ask_text(question: &Question) -> Result<Option<AnswerValue>, AppError> {
    let hint = if question.placeholder.is_empty() {
        "> ".to_string()
    } else {
        format!("({}) > ", question.placeholder)
    };
    let input = prompt(&hint)?;
    if input.is_empty() {
        return Ok(None);
    }
    Ok(Some(AnswerValue::Text(input)))
}

fn ask_number(question: &Question) -> Result<Option<AnswerValue>, AppError> {
    loop {
        let input = ask_text(question)?;
        match input {
            None => return Ok(None),
            Some(AnswerValue::Text(raw)) => match raw.parse::<f64>() {
                Ok(n) => return Ok(Some(AnswerValue::Number(n))),
                Err(_) => println!("Please enter a number."),
            },
            Some(other) => return Ok(Some(other)),
        }
    }
}

fn ask_choice(question: &Question) -> Result<Option<AnswerValue>, AppError> {
    print_options(question);
    loop {
        let input = prompt("choice # > ")?;
        if input.is_empty() {
            return Ok(None);
        }
        match parse_option_index(question, &input) {
            Some(index) => {
                return Ok(Some(AnswerValue::Text(
                    question.options[index].value.clone(),
                )));
            }
            None => println!("Pick a number between 1 and {}.", question.options.len()),
        }
    }
}

fn ask_multi(question: &Question) -> Result<Option<AnswerValue>, AppError> {
    print_options(question);
    loop {
        let input = prompt("choice #s (comma-separated) > ")?;
        if input.is_empty() {
            return Ok(None);
        }
        let indices: Option<Vec<usize>> = input
            .split(',')
            .map(|part| parse_option_index(question, part.trim()))
            .collect();
        match indices {
            Some(indices) => {
                let mut values: Vec<String> = indices
                    .into_iter()
                    .map(|i| question.options[i].value.clone())
                    .collect();
                values.dedup();
                return Ok(Some(AnswerValue::Multi(values)));
            }
            None => println!("Pick numbers between 1 and {}.", question.options.len()),
        }
    }
}

fn print_options(question: &Question) {
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option.label);
    }
}

fn parse_option_index(question: &Question, raw: &str) -> Option<usize> {
    raw.parse::<usize>()
        .ok()
        .filter(|n| (1..=question.options.len()).contains(n))
        .map(|n| n - 1)
}

/// Display form of a stored answer, with option values resolved to labels.
pub(crate) fn render_answer(question: &Question, value: &AnswerValue) -> String {
    match value {
        AnswerValue::Text(s) => question.option_label(s).to_string(),
        AnswerValue::Number(n) => {
            if n.fract() == 0.0 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        AnswerValue::Multi(values) => values
            .iter()
            .map(|v| question.option_label(v).to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}
