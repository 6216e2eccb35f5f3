use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on students for filtering by status
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_status")
                    .table(Students::Table)
                    .col(Students::Status)
                    .to_owned(),
            )
            .await?;

        // Index on addresses.student_id for faster joins
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_addresses_student_id")
                    .table(Addresses::Table)
                    .col(Addresses::StudentId)
                    .to_owned(),
            )
            .await?;

        // Indexes on department references, also used by ON DELETE SET NULL
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_instructors_department_id")
                    .table(Instructors::Table)
                    .col(Instructors::DepartmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_department_id")
                    .table(Courses::Table)
                    .col(Courses::DepartmentId)
                    .to_owned(),
            )
            .await?;

        // Reverse lookups on the junction tables
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_instructors_instructor_id")
                    .table(CourseInstructors::Table)
                    .col(CourseInstructors::InstructorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_prerequisites_prerequisite_course_id")
                    .table(CoursePrerequisites::Table)
                    .col(CoursePrerequisites::PrerequisiteCourseId)
                    .to_owned(),
            )
            .await?;

        // Index on course_offerings.semester_id for per-semester listings
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_offerings_semester_id")
                    .table(CourseOfferings::Table)
                    .col(CourseOfferings::SemesterId)
                    .to_owned(),
            )
            .await?;

        // Index on enrollments.offering_id for class rosters
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_offering_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::OfferingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_enrollments_offering_id",
            "idx_course_offerings_semester_id",
            "idx_course_prerequisites_prerequisite_course_id",
            "idx_course_instructors_instructor_id",
            "idx_courses_department_id",
            "idx_instructors_department_id",
            "idx_addresses_student_id",
            "idx_students_status",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Students {
    Table,
    Status,
}

#[derive(Iden)]
enum Addresses {
    Table,
    StudentId,
}

#[derive(Iden)]
enum Instructors {
    Table,
    DepartmentId,
}

#[derive(Iden)]
enum Courses {
    Table,
    DepartmentId,
}

#[derive(Iden)]
enum CourseInstructors {
    Table,
    InstructorId,
}

#[derive(Iden)]
enum CoursePrerequisites {
    Table,
    PrerequisiteCourseId,
}

#[derive(Iden)]
enum CourseOfferings {
    Table,
    SemesterId,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    OfferingId,
}
