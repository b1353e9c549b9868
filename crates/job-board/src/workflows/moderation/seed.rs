//! Demo records the board starts with on every launch.

use chrono::NaiveDate;

use super::domain::{
    Candidate, CandidateDocument, CandidateId, CandidateStatus, DocumentKind, Job, JobId,
    JobStatus, User, UserId, UserRole, UserStatus,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: UserId(1),
            name: "Sarah Wilson".to_string(),
            email: "sarah@techcorp.com".to_string(),
            role: UserRole::Recruiter,
            company: "TechCorp Inc".to_string(),
            registered_date: date(2024, 1, 20),
            status: UserStatus::Pending,
        },
        User {
            id: UserId(2),
            name: "John Smith".to_string(),
            email: "john@student.edu".to_string(),
            role: UserRole::Student,
            company: "University".to_string(),
            registered_date: date(2024, 1, 15),
            status: UserStatus::Active,
        },
        User {
            id: UserId(3),
            name: "Mike Johnson".to_string(),
            email: "mike@startup.com".to_string(),
            role: UserRole::Recruiter,
            company: "StartupCo".to_string(),
            registered_date: date(2024, 1, 10),
            status: UserStatus::Suspended,
        },
    ]
}

pub fn jobs() -> Vec<Job> {
    vec![
        Job {
            id: JobId(1),
            title: "Software Engineer".to_string(),
            company: "TechCorp Inc".to_string(),
            department: "Engineering".to_string(),
            location: "San Francisco, CA".to_string(),
            applications: 45,
            posted_date: date(2024, 1, 20),
            status: JobStatus::Active,
            employment_type: None,
            salary: None,
            description: None,
            requirements: None,
        },
        Job {
            id: JobId(2),
            title: "Data Scientist".to_string(),
            company: "DataCorp".to_string(),
            department: "Analytics".to_string(),
            location: "Remote".to_string(),
            applications: 32,
            posted_date: date(2024, 1, 18),
            status: JobStatus::Closed,
            employment_type: None,
            salary: None,
            description: None,
            requirements: None,
        },
        Job {
            id: JobId(3),
            title: "Marketing Associate".to_string(),
            company: "TechCorp Inc".to_string(),
            department: "Marketing".to_string(),
            location: "New York, NY".to_string(),
            applications: 28,
            posted_date: date(2024, 1, 10),
            status: JobStatus::Active,
            employment_type: None,
            salary: None,
            description: None,
            requirements: None,
        },
    ]
}

fn application_documents(prefix: &str) -> Vec<CandidateDocument> {
    vec![
        CandidateDocument {
            file_name: format!("{prefix}_resume.pdf"),
            kind: DocumentKind::Resume,
        },
        CandidateDocument {
            file_name: format!("{prefix}_cover.pdf"),
            kind: DocumentKind::CoverLetter,
        },
    ]
}

pub fn candidates() -> Vec<Candidate> {
    vec![
        Candidate {
            id: CandidateId(1),
            name: "Alice Johnson".to_string(),
            email: "alice.johnson@mit.edu".to_string(),
            university: "MIT".to_string(),
            position: "Software Engineer Intern".to_string(),
            skills: strings(&["React", "Node.js", "Python"]),
            applied_date: date(2024, 1, 16),
            status: CandidateStatus::New,
            rating: None,
            notes: String::new(),
            documents: application_documents("alice"),
        },
        Candidate {
            id: CandidateId(2),
            name: "Bob Smith".to_string(),
            email: "bob.smith@stanford.edu".to_string(),
            university: "Stanford".to_string(),
            position: "Software Engineer Intern".to_string(),
            skills: strings(&["Java", "Spring", "AWS"]),
            applied_date: date(2024, 1, 15),
            status: CandidateStatus::Reviewed,
            rating: Some(4),
            notes: String::new(),
            documents: application_documents("bob"),
        },
        Candidate {
            id: CandidateId(3),
            name: "Carol Davis".to_string(),
            email: "carol.davis@harvard.edu".to_string(),
            university: "Harvard".to_string(),
            position: "Marketing Associate".to_string(),
            skills: strings(&["Digital Marketing", "SEO", "Analytics"]),
            applied_date: date(2024, 1, 14),
            status: CandidateStatus::Interview,
            rating: None,
            notes: String::new(),
            documents: application_documents("carol"),
        },
    ]
}
