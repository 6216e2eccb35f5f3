use super::{find_target, non_blank, require_parent};
use crate::{
    entities::{
        address, course, course_offering, enrollment, now, semester, student, student_profile,
    },
    error::{StoreError, StoreResult, require},
};
use chrono::Utc;
use log::{debug, info, warn};
use models::{
    status::StudentStatus,
    student::{NewAddress, NewProfile, NewStudent, StudentUpdate},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::Expr,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// An enrollment together with the offering, course and semester it points at
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentDetail {
    pub enrollment: enrollment::Model,
    pub offering: course_offering::Model,
    pub course: course::Model,
    pub semester: semester::Model,
}

/// Everything the store holds about one student
#[derive(Debug, Clone, Serialize)]
pub struct StudentRecord {
    pub student: student::Model,
    pub profile: Option<student_profile::Model>,
    pub addresses: Vec<address::Model>,
    pub enrollments: Vec<EnrollmentDetail>,
}

/// Rows removed alongside a student
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StudentDeletion {
    pub profiles: u64,
    pub addresses: u64,
    pub enrollments: u64,
}

pub struct StudentService;

impl StudentService {
    /// Registers a student, defaulting the status to `active` and the enrolled date to today
    pub async fn create_student<C>(db: &C, new_student: NewStudent) -> StoreResult<student::Model>
    where
        C: ConnectionTrait,
    {
        require("registration_number", &new_student.registration_number)?;
        require("first_name", &new_student.first_name)?;
        require("last_name", &new_student.last_name)?;
        require("email", &new_student.email)?;

        let registration_number = new_student.registration_number.trim().to_string();
        let model = student::ActiveModel {
            id: Set(Uuid::new_v4()),
            registration_number: Set(registration_number.clone()),
            first_name: Set(new_student.first_name.trim().to_string()),
            last_name: Set(new_student.last_name.trim().to_string()),
            email: Set(new_student.email.trim().to_string()),
            phone: Set(non_blank(new_student.phone)),
            date_of_birth: Set(new_student.date_of_birth),
            status: Set(new_student.status.unwrap_or_default()),
            enrolled_date: Set(new_student
                .enrolled_date
                .unwrap_or_else(|| Utc::now().date_naive())),
            ..Default::default()
        };

        let student = model
            .insert(db)
            .await
            .map_err(StoreError::from)
            .inspect_err(|e| warn!("Rejected student {registration_number}: {e}"))?;

        debug!("Created student {} ({})", student.id, student.registration_number);
        Ok(student)
    }

    pub async fn get_student<C>(db: &C, student_id: Uuid) -> StoreResult<Option<student::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(student::Entity::find_by_id(student_id).one(db).await?)
    }

    pub async fn find_by_registration_number<C>(
        db: &C,
        registration_number: &str,
    ) -> StoreResult<Option<student::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(student::Entity::find()
            .filter(student::Column::RegistrationNumber.eq(registration_number.trim()))
            .one(db)
            .await?)
    }

    /// Query students with pagination and filtering, pages are 1-based
    pub async fn list_students<C>(
        db: &C,
        page: u64,
        per_page: u64,
        status: Option<StudentStatus>,
        search: Option<String>,
    ) -> StoreResult<(Vec<student::Model>, u64)>
    where
        C: ConnectionTrait,
    {
        let mut condition = Condition::all();

        if let Some(status) = status {
            condition = condition.add(student::Column::Status.eq(status));
        }

        if let Some(search) = non_blank(search) {
            let pattern = format!("%{search}%");
            let search_condition = Condition::any()
                .add(student::Column::RegistrationNumber.like(pattern.clone()))
                .add(student::Column::FirstName.like(pattern.clone()))
                .add(student::Column::LastName.like(pattern.clone()))
                .add(student::Column::Email.like(pattern));
            condition = condition.add(search_condition);
        }

        let query = student::Entity::find()
            .filter(condition)
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName)
            .order_by_asc(student::Column::RegistrationNumber);

        // Apply pagination
        let total_items = query.clone().count(db).await?;
        let paginator = query.paginate(db, per_page.max(1));
        // SeaORM uses 0-based pages
        let students = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((students, total_items))
    }

    /// Applies a partial update of contact details
    pub async fn update_student<C>(
        db: &C,
        student_id: Uuid,
        update: StudentUpdate,
    ) -> StoreResult<student::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let mut model = find_target::<student::Entity, _>(&txn, "student", student_id)
            .await?
            .into_active_model();

        if let Some(first_name) = update.first_name {
            require("first_name", &first_name)?;
            model.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = update.last_name {
            require("last_name", &last_name)?;
            model.last_name = Set(last_name.trim().to_string());
        }
        if let Some(email) = update.email {
            require("email", &email)?;
            model.email = Set(email.trim().to_string());
        }
        if let Some(phone) = update.phone {
            model.phone = Set(non_blank(phone));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(date_of_birth);
        }

        let student = model.update(&txn).await?;
        txn.commit().await?;
        Ok(student)
    }

    /// Sets the status, any transition between statuses is accepted
    pub async fn set_status<C>(
        db: &C,
        student_id: Uuid,
        status: StudentStatus,
    ) -> StoreResult<student::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let mut model = find_target::<student::Entity, _>(&txn, "student", student_id)
            .await?
            .into_active_model();
        model.status = Set(status);

        let student = model.update(&txn).await?;
        txn.commit().await?;

        info!("Student {} is now {}", student.id, status.as_str());
        Ok(student)
    }

    /// Deletes a student together with their profile, addresses and enrollments
    pub async fn delete_student<C>(db: &C, student_id: Uuid) -> StoreResult<StudentDeletion>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        find_target::<student::Entity, _>(&txn, "student", student_id).await?;

        let enrollments = enrollment::Entity::delete_many()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .exec(&txn)
            .await?
            .rows_affected;
        let addresses = address::Entity::delete_many()
            .filter(address::Column::StudentId.eq(student_id))
            .exec(&txn)
            .await?
            .rows_affected;
        let profiles = student_profile::Entity::delete_many()
            .filter(student_profile::Column::StudentId.eq(student_id))
            .exec(&txn)
            .await?
            .rows_affected;

        student::Entity::delete_by_id(student_id).exec(&txn).await?;
        txn.commit().await?;

        let deletion = StudentDeletion {
            profiles,
            addresses,
            enrollments,
        };
        info!("Deleted student {student_id} with {deletion:?}");
        Ok(deletion)
    }

    /// Creates the one-to-one profile of a student
    pub async fn create_profile<C>(
        db: &C,
        student_id: Uuid,
        profile: NewProfile,
    ) -> StoreResult<student_profile::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        require_parent::<student::Entity, _>(&txn, "student", student_id).await?;

        let existing = student_profile::Entity::find()
            .filter(student_profile::Column::StudentId.eq(student_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(StoreError::UniquenessViolation(format!(
                "student {student_id} already has a profile"
            )));
        }

        let model = student_profile::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            gender: Set(non_blank(profile.gender)),
            nationality: Set(non_blank(profile.nationality)),
            bio: Set(non_blank(profile.bio)),
            emergency_contact_name: Set(non_blank(profile.emergency_contact_name)),
            emergency_contact_phone: Set(non_blank(profile.emergency_contact_phone)),
            ..Default::default()
        };

        let profile = model.insert(&txn).await?;
        txn.commit().await?;
        Ok(profile)
    }

    pub async fn get_profile<C>(
        db: &C,
        student_id: Uuid,
    ) -> StoreResult<Option<student_profile::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(student_profile::Entity::find()
            .filter(student_profile::Column::StudentId.eq(student_id))
            .one(db)
            .await?)
    }

    /// Replaces every field of an existing profile
    pub async fn update_profile<C>(
        db: &C,
        student_id: Uuid,
        profile: NewProfile,
    ) -> StoreResult<student_profile::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let mut model = student_profile::Entity::find()
            .filter(student_profile::Column::StudentId.eq(student_id))
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::not_found("student profile", student_id))?
            .into_active_model();

        model.gender = Set(non_blank(profile.gender));
        model.nationality = Set(non_blank(profile.nationality));
        model.bio = Set(non_blank(profile.bio));
        model.emergency_contact_name = Set(non_blank(profile.emergency_contact_name));
        model.emergency_contact_phone = Set(non_blank(profile.emergency_contact_phone));

        let profile = model.update(&txn).await?;
        txn.commit().await?;
        Ok(profile)
    }

    /// Adds an address, a primary address takes the flag from the student's others
    pub async fn add_address<C>(
        db: &C,
        student_id: Uuid,
        new_address: NewAddress,
    ) -> StoreResult<address::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        require("label", &new_address.label)?;
        require("line1", &new_address.line1)?;
        require("city", &new_address.city)?;
        require("country", &new_address.country)?;

        let txn = db.begin().await?;
        require_parent::<student::Entity, _>(&txn, "student", student_id).await?;

        if new_address.is_primary {
            Self::clear_primary(&txn, student_id).await?;
        }

        let model = address::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            label: Set(new_address.label.trim().to_string()),
            line1: Set(new_address.line1.trim().to_string()),
            line2: Set(non_blank(new_address.line2)),
            city: Set(new_address.city.trim().to_string()),
            state: Set(non_blank(new_address.state)),
            postal_code: Set(non_blank(new_address.postal_code)),
            country: Set(new_address.country.trim().to_string()),
            is_primary: Set(new_address.is_primary),
            ..Default::default()
        };

        let address = model.insert(&txn).await?;
        txn.commit().await?;
        Ok(address)
    }

    /// Lists a student's addresses, primary first
    pub async fn list_addresses<C>(db: &C, student_id: Uuid) -> StoreResult<Vec<address::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(address::Entity::find()
            .filter(address::Column::StudentId.eq(student_id))
            .order_by_desc(address::Column::IsPrimary)
            .order_by_asc(address::Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// Marks one address as primary and clears the flag on the student's other addresses
    pub async fn set_primary_address<C>(db: &C, address_id: Uuid) -> StoreResult<address::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        let address = find_target::<address::Entity, _>(&txn, "address", address_id).await?;

        Self::clear_primary(&txn, address.student_id).await?;

        let mut model = address.into_active_model();
        model.is_primary = Set(true);
        let address = model.update(&txn).await?;

        txn.commit().await?;
        Ok(address)
    }

    pub async fn delete_address<C>(db: &C, address_id: Uuid) -> StoreResult<()>
    where
        C: ConnectionTrait,
    {
        let result = address::Entity::delete_by_id(address_id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("address", address_id));
        }
        Ok(())
    }

    /// Get a single student with profile, addresses and enrollment history
    pub async fn get_student_record<C>(
        db: &C,
        student_id: Uuid,
    ) -> StoreResult<Option<StudentRecord>>
    where
        C: ConnectionTrait,
    {
        let student = match student::Entity::find_by_id(student_id).one(db).await? {
            Some(student) => student,
            None => return Ok(None),
        };

        let (profile, addresses, enrollments) = futures::try_join!(
            Self::get_profile(db, student_id),
            Self::list_addresses(db, student_id),
            async {
                Ok::<_, StoreError>(
                    enrollment::Entity::find()
                        .filter(enrollment::Column::StudentId.eq(student_id))
                        .order_by_asc(enrollment::Column::EnrolledAt)
                        .all(db)
                        .await?,
                )
            },
        )?;

        let enrollments = Self::attach_offerings(db, enrollments).await?;

        Ok(Some(StudentRecord {
            student,
            profile,
            addresses,
            enrollments,
        }))
    }

    /// Batch fetch offerings, courses and semesters for a set of enrollments
    async fn attach_offerings<C>(
        db: &C,
        enrollments: Vec<enrollment::Model>,
    ) -> StoreResult<Vec<EnrollmentDetail>>
    where
        C: ConnectionTrait,
    {
        if enrollments.is_empty() {
            return Ok(vec![]);
        }

        let offering_ids: Vec<Uuid> = enrollments.iter().map(|e| e.offering_id).collect();
        let offerings: HashMap<Uuid, course_offering::Model> = course_offering::Entity::find()
            .filter(course_offering::Column::Id.is_in(offering_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        let course_ids: Vec<Uuid> = offerings.values().map(|o| o.course_id).collect();
        let semester_ids: Vec<Uuid> = offerings.values().map(|o| o.semester_id).collect();

        // Build lookup maps
        let courses: HashMap<Uuid, course::Model> = course::Entity::find()
            .filter(course::Column::Id.is_in(course_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let semesters: HashMap<Uuid, semester::Model> = semester::Entity::find()
            .filter(semester::Column::Id.is_in(semester_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        // Enrollments whose offering vanished between the queries are skipped
        let details = enrollments
            .into_iter()
            .filter_map(|enrollment| {
                let offering = offerings.get(&enrollment.offering_id)?.clone();
                let course = courses.get(&offering.course_id)?.clone();
                let semester = semesters.get(&offering.semester_id)?.clone();
                Some(EnrollmentDetail {
                    enrollment,
                    offering,
                    course,
                    semester,
                })
            })
            .collect();

        Ok(details)
    }

    async fn clear_primary<C>(db: &C, student_id: Uuid) -> StoreResult<()>
    where
        C: ConnectionTrait,
    {
        address::Entity::update_many()
            .col_expr(address::Column::IsPrimary, Expr::value(false))
            .col_expr(address::Column::UpdatedAt, Expr::value(now()))
            .filter(address::Column::StudentId.eq(student_id))
            .filter(address::Column::IsPrimary.eq(true))
            .exec(db)
            .await?;
        Ok(())
    }
}
