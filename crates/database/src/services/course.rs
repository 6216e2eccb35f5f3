use super::{find_target, non_blank, offering::OfferingService, require_parent};
use crate::{
    entities::{
        course, course_instructor, course_offering, course_prerequisite, department, instructor,
    },
    error::{StoreError, StoreResult, require},
};
use log::{debug, info, warn};
use models::{course::NewCourse, credits::Credits, status::InstructorRole};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// An instructor assigned to a course and the role they hold on it
#[derive(Debug, Clone, Serialize)]
pub struct AssignedInstructor {
    pub instructor: instructor::Model,
    pub role: InstructorRole,
}

/// A course with its department, instructors and direct prerequisites
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    pub course: course::Model,
    pub department: Option<department::Model>,
    pub instructors: Vec<AssignedInstructor>,
    pub prerequisites: Vec<course::Model>,
}

/// Rows removed alongside a course
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CourseDeletion {
    pub offerings: u64,
    pub enrollments: u64,
    pub instructor_links: u64,
    pub prerequisite_links: u64,
}

fn checked_credits(credits: i32) -> StoreResult<Credits> {
    Credits::new(credits).map_err(|e| StoreError::InvariantViolation(e.to_string()))
}

pub struct CourseService;

impl CourseService {
    pub async fn create_course<C>(db: &C, new_course: NewCourse) -> StoreResult<course::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let credits = checked_credits(new_course.credits)?;
        require("code", &new_course.code)?;
        require("title", &new_course.title)?;

        let txn = db.begin().await?;
        if let Some(department_id) = new_course.department_id {
            require_parent::<department::Entity, _>(&txn, "department", department_id).await?;
        }

        let code = new_course.code.trim().to_string();
        let model = course::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.clone()),
            title: Set(new_course.title.trim().to_string()),
            description: Set(non_blank(new_course.description)),
            credits: Set(credits.get()),
            department_id: Set(new_course.department_id),
            ..Default::default()
        };

        let course = model
            .insert(&txn)
            .await
            .map_err(StoreError::from)
            .inspect_err(|e| warn!("Rejected course {code}: {e}"))?;
        txn.commit().await?;

        debug!("Created course {} ({})", course.id, course.code);
        Ok(course)
    }

    pub async fn get_course<C>(db: &C, course_id: Uuid) -> StoreResult<Option<course::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(course::Entity::find_by_id(course_id).one(db).await?)
    }

    pub async fn find_by_code<C>(db: &C, code: &str) -> StoreResult<Option<course::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(course::Entity::find()
            .filter(course::Column::Code.eq(code.trim()))
            .one(db)
            .await?)
    }

    pub async fn list_for_department<C>(
        db: &C,
        department_id: Uuid,
    ) -> StoreResult<Vec<course::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(course::Entity::find()
            .filter(course::Column::DepartmentId.eq(department_id))
            .order_by_asc(course::Column::Code)
            .all(db)
            .await?)
    }

    pub async fn update_credits<C>(
        db: &C,
        course_id: Uuid,
        credits: i32,
    ) -> StoreResult<course::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let credits = checked_credits(credits)?;

        let txn = db.begin().await?;
        let mut model = find_target::<course::Entity, _>(&txn, "course", course_id)
            .await?
            .into_active_model();
        model.credits = Set(credits.get());

        let course = model.update(&txn).await?;
        txn.commit().await?;
        Ok(course)
    }

    /// Deletes a course with its offerings (and their enrollments), instructor links
    /// and every prerequisite edge touching it
    pub async fn delete_course<C>(db: &C, course_id: Uuid) -> StoreResult<CourseDeletion>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        find_target::<course::Entity, _>(&txn, "course", course_id).await?;

        let offering_ids: Vec<Uuid> = course_offering::Entity::find()
            .select_only()
            .column(course_offering::Column::Id)
            .filter(course_offering::Column::CourseId.eq(course_id))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await?;
        let (offerings, enrollments) = OfferingService::remove_offerings(&txn, offering_ids).await?;

        let instructor_links = course_instructor::Entity::delete_many()
            .filter(course_instructor::Column::CourseId.eq(course_id))
            .exec(&txn)
            .await?
            .rows_affected;
        let prerequisite_links = course_prerequisite::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(course_prerequisite::Column::CourseId.eq(course_id))
                    .add(course_prerequisite::Column::PrerequisiteCourseId.eq(course_id)),
            )
            .exec(&txn)
            .await?
            .rows_affected;

        course::Entity::delete_by_id(course_id).exec(&txn).await?;
        txn.commit().await?;

        let deletion = CourseDeletion {
            offerings,
            enrollments,
            instructor_links,
            prerequisite_links,
        };
        info!("Deleted course {course_id} with {deletion:?}");
        Ok(deletion)
    }

    pub async fn assign_instructor<C>(
        db: &C,
        course_id: Uuid,
        instructor_id: Uuid,
        role: InstructorRole,
    ) -> StoreResult<course_instructor::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        require_parent::<course::Entity, _>(&txn, "course", course_id).await?;
        require_parent::<instructor::Entity, _>(&txn, "instructor", instructor_id).await?;

        let existing = course_instructor::Entity::find_by_id((course_id, instructor_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(StoreError::UniquenessViolation(format!(
                "instructor {instructor_id} is already assigned to course {course_id}"
            )));
        }

        let model = course_instructor::ActiveModel {
            course_id: Set(course_id),
            instructor_id: Set(instructor_id),
            role: Set(role),
            ..Default::default()
        };

        let link = model.insert(&txn).await?;
        txn.commit().await?;

        debug!(
            "Assigned instructor {instructor_id} to course {course_id} as {}",
            role.as_str()
        );
        Ok(link)
    }

    pub async fn remove_instructor<C>(
        db: &C,
        course_id: Uuid,
        instructor_id: Uuid,
    ) -> StoreResult<()>
    where
        C: ConnectionTrait,
    {
        let result = course_instructor::Entity::delete_by_id((course_id, instructor_id))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound {
                entity: "course instructor",
                id: format!("{course_id}/{instructor_id}"),
            });
        }
        Ok(())
    }

    /// Records that `course_id` requires `prerequisite_id`
    ///
    /// Self references and edges that would close a cycle in the prerequisite
    /// graph are rejected as invariant violations.
    pub async fn add_prerequisite<C>(
        db: &C,
        course_id: Uuid,
        prerequisite_id: Uuid,
    ) -> StoreResult<course_prerequisite::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        if course_id == prerequisite_id {
            return Err(StoreError::InvariantViolation(format!(
                "course {course_id} cannot be its own prerequisite"
            )));
        }

        let txn = db.begin().await?;
        let course = require_parent::<course::Entity, _>(&txn, "course", course_id).await?;
        let prerequisite =
            require_parent::<course::Entity, _>(&txn, "course", prerequisite_id).await?;

        let existing = course_prerequisite::Entity::find_by_id((course_id, prerequisite_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(StoreError::UniquenessViolation(format!(
                "{} already requires {}",
                course.code, prerequisite.code
            )));
        }

        if Self::requires_transitively(&txn, prerequisite_id, course_id).await? {
            return Err(StoreError::InvariantViolation(format!(
                "{} already requires {}, adding the edge would create a cycle",
                prerequisite.code, course.code
            )));
        }

        let model = course_prerequisite::ActiveModel {
            course_id: Set(course_id),
            prerequisite_course_id: Set(prerequisite_id),
            ..Default::default()
        };

        let edge = model.insert(&txn).await?;
        txn.commit().await?;

        debug!("{} now requires {}", course.code, prerequisite.code);
        Ok(edge)
    }

    pub async fn remove_prerequisite<C>(
        db: &C,
        course_id: Uuid,
        prerequisite_id: Uuid,
    ) -> StoreResult<()>
    where
        C: ConnectionTrait,
    {
        let result = course_prerequisite::Entity::delete_by_id((course_id, prerequisite_id))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound {
                entity: "course prerequisite",
                id: format!("{course_id}/{prerequisite_id}"),
            });
        }
        Ok(())
    }

    /// Direct prerequisites of a course, ordered by code
    pub async fn prerequisites_of<C>(db: &C, course_id: Uuid) -> StoreResult<Vec<course::Model>>
    where
        C: ConnectionTrait,
    {
        let mut prerequisites: Vec<course::Model> = course_prerequisite::Entity::find()
            .filter(course_prerequisite::Column::CourseId.eq(course_id))
            .find_also_related(course::Entity)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(_, course)| course)
            .collect();

        prerequisites.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(prerequisites)
    }

    /// Get a single course with its department, instructors and prerequisites
    pub async fn get_course_detail<C>(db: &C, course_id: Uuid) -> StoreResult<Option<CourseDetail>>
    where
        C: ConnectionTrait,
    {
        let course = match course::Entity::find_by_id(course_id).one(db).await? {
            Some(course) => course,
            None => return Ok(None),
        };

        let department = match course.department_id {
            Some(department_id) => department::Entity::find_by_id(department_id).one(db).await?,
            None => None,
        };

        // Batch fetch all course-instructor relationships
        let mut instructors: Vec<AssignedInstructor> = course_instructor::Entity::find()
            .filter(course_instructor::Column::CourseId.eq(course_id))
            .find_also_related(instructor::Entity)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(link, instructor)| {
                instructor.map(|instructor| AssignedInstructor {
                    instructor,
                    role: link.role,
                })
            })
            .collect();

        // Leads first, then by name
        instructors.sort_by(|a, b| {
            (a.role != InstructorRole::Lead, &a.instructor.last_name)
                .cmp(&(b.role != InstructorRole::Lead, &b.instructor.last_name))
        });

        let prerequisites = Self::prerequisites_of(db, course_id).await?;

        Ok(Some(CourseDetail {
            course,
            department,
            instructors,
            prerequisites,
        }))
    }

    /// Walks the prerequisite graph breadth-first from `from`, looking for `target`
    async fn requires_transitively<C>(db: &C, from: Uuid, target: Uuid) -> StoreResult<bool>
    where
        C: ConnectionTrait,
    {
        let mut visited = HashSet::from([from]);
        let mut frontier = vec![from];

        while !frontier.is_empty() {
            let sources = std::mem::take(&mut frontier);
            let edges = course_prerequisite::Entity::find()
                .filter(course_prerequisite::Column::CourseId.is_in(sources))
                .all(db)
                .await?;

            for edge in edges {
                if edge.prerequisite_course_id == target {
                    return Ok(true);
                }
                if visited.insert(edge.prerequisite_course_id) {
                    frontier.push(edge.prerequisite_course_id);
                }
            }
        }

        Ok(false)
    }
}
