//! Provisioning endpoints: accounts, subjects, teacher assignment.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{
    Actor, StudentAccount, StudentId, Subject, SubjectId, TeacherAccount, TeacherId, TimeMs,
    SubjectStatus,
};
use crate::error::{AppError, LedgerError};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub id: Option<String>,
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentRequest>,
) -> Result<Json<StudentAccount>, AppError> {
    let id = match req.id {
        Some(id) if !id.trim().is_empty() => StudentId::new(id),
        _ => StudentId::generate(),
    };

    let account = state
        .repo
        .create_student(&id, state.config.signup_credit, TimeMs::now())
        .await?;

    Ok(Json(account))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherRequest {
    pub id: Option<String>,
}

pub async fn create_teacher(
    State(state): State<AppState>,
    Json(req): Json<CreateTeacherRequest>,
) -> Result<Json<TeacherAccount>, AppError> {
    let id = match req.id {
        Some(id) if !id.trim().is_empty() => TeacherId::new(id),
        _ => TeacherId::generate(),
    };

    let account = state.repo.create_teacher(&id, TimeMs::now()).await?;
    Ok(Json(account))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    pub status: Option<String>,
}

pub async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<CreateSubjectRequest>,
) -> Result<Json<Subject>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    let status = match req.status.as_deref() {
        None => SubjectStatus::Active,
        Some(s) => SubjectStatus::parse(s)
            .ok_or_else(|| AppError::BadRequest(format!("invalid status {:?}", s)))?,
    };

    if state.repo.subject_name_exists(&req.name).await? {
        return Err(AppError::Ledger(LedgerError::Validation(format!(
            "a subject named {:?} already exists",
            req.name
        ))));
    }

    let subject = state
        .repo
        .create_subject(
            &SubjectId::generate(),
            &req.name,
            &req.description,
            req.price,
            status,
        )
        .await?;

    Ok(Json(subject))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTeacherRequest {
    pub teacher_id: String,
}

pub async fn assign_teacher(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(req): Json<AssignTeacherRequest>,
) -> Result<Json<Subject>, AppError> {
    let subject_id = SubjectId::new(subject_id);
    let teacher_id = TeacherId::new(req.teacher_id);

    if state.repo.get_subject(&subject_id).await?.is_none() {
        return Err(AppError::Ledger(LedgerError::NotFound(format!(
            "subject {}",
            subject_id
        ))));
    }
    match state.repo.find_actor(teacher_id.as_str()).await? {
        Some(Actor::Teacher(_)) => {}
        Some(_) => {
            return Err(AppError::Ledger(LedgerError::Validation(format!(
                "actor {} is not a teacher",
                teacher_id
            ))))
        }
        None => {
            return Err(AppError::Ledger(LedgerError::NotFound(format!(
                "teacher {}",
                teacher_id
            ))))
        }
    }

    let assigned = state
        .repo
        .assign_teacher(&subject_id, &teacher_id, TimeMs::now())
        .await?;
    if !assigned {
        return Err(AppError::Ledger(LedgerError::Validation(format!(
            "teacher {} is already assigned to {}",
            teacher_id, subject_id
        ))));
    }

    let subject = state
        .repo
        .get_subject(&subject_id)
        .await?
        .ok_or_else(|| AppError::Ledger(LedgerError::NotFound(format!("subject {}", subject_id))))?;

    Ok(Json(subject))
}
