/// Fixed reviewer instructions prepended to every evaluation request.
pub const INSTRUCTION_HEADER: &str = "
Hey, act like a skilled or very experienced ATS (Application Tracking System)
with a deep understanding of the tech field, software engineering, data science, data analysis,
and data engineering. Your task is to evaluate the resume based on the given job description.
Consider the job market is very competitive and provide the best assistance for improving the resumes.
Assign the percentage matching based on JD (Job Description) and the missing keywords with high accuracy.

Give the results as:
JD Match: <percentage>
Missing Keywords: [list]
Profile Summary: <summary>
";

/// Composes one evaluation request. Text is passed through untouched, without truncation.
pub fn build_prompt(job_description: &str, resume_text: &str) -> String {
    format!("{INSTRUCTION_HEADER}\nJob Description:\n{job_description}\nResume:\n{resume_text}")
}
