use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create instructors table, department link is nullified when the department goes away
        manager
            .create_table(
                Table::create()
                    .table(Instructors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instructors::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Instructors::FirstName).string().not_null())
                    .col(ColumnDef::new(Instructors::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Instructors::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Instructors::DepartmentId).uuid())
                    .col(
                        ColumnDef::new(Instructors::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Instructors::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-instructors-department_id")
                            .from(Instructors::Table, Instructors::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(
                        ColumnDef::new(Courses::Credits)
                            .integer()
                            .not_null()
                            .check(Expr::col(Courses::Credits).gt(0)),
                    )
                    .col(ColumnDef::new(Courses::DepartmentId).uuid())
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-department_id")
                            .from(Courses::Table, Courses::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_instructors junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(CourseInstructors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CourseInstructors::CourseId).uuid().not_null())
                    .col(
                        ColumnDef::new(CourseInstructors::InstructorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseInstructors::Role)
                            .string_len(16)
                            .not_null()
                            .default("lead")
                            .check(Expr::col(CourseInstructors::Role).is_in(["lead", "assistant"])),
                    )
                    .col(
                        ColumnDef::new(CourseInstructors::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk-course_instructors")
                            .col(CourseInstructors::CourseId)
                            .col(CourseInstructors::InstructorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_instructors-course_id")
                            .from(CourseInstructors::Table, CourseInstructors::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_instructors-instructor_id")
                            .from(CourseInstructors::Table, CourseInstructors::InstructorId)
                            .to(Instructors::Table, Instructors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_prerequisites table (self-referential many-to-many on courses)
        manager
            .create_table(
                Table::create()
                    .table(CoursePrerequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoursePrerequisites::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePrerequisites::PrerequisiteCourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePrerequisites::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk-course_prerequisites")
                            .col(CoursePrerequisites::CourseId)
                            .col(CoursePrerequisites::PrerequisiteCourseId),
                    )
                    .check(
                        Expr::col(CoursePrerequisites::CourseId)
                            .ne(Expr::col(CoursePrerequisites::PrerequisiteCourseId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_prerequisites-course_id")
                            .from(CoursePrerequisites::Table, CoursePrerequisites::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_prerequisites-prerequisite_course_id")
                            .from(
                                CoursePrerequisites::Table,
                                CoursePrerequisites::PrerequisiteCourseId,
                            )
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create semesters table
        manager
            .create_table(
                Table::create()
                    .table(Semesters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semesters::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Semesters::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Semesters::StartDate).date().not_null())
                    .col(ColumnDef::new(Semesters::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Semesters::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Semesters::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Semesters::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Semesters::EndDate).gte(Expr::col(Semesters::StartDate)))
                    .to_owned(),
            )
            .await?;

        // Create course_offerings table
        manager
            .create_table(
                Table::create()
                    .table(CourseOfferings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseOfferings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseOfferings::CourseId).uuid().not_null())
                    .col(ColumnDef::new(CourseOfferings::SemesterId).uuid().not_null())
                    .col(
                        ColumnDef::new(CourseOfferings::Section)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseOfferings::Capacity)
                            .integer()
                            .not_null()
                            .check(Expr::col(CourseOfferings::Capacity).gt(0)),
                    )
                    .col(
                        ColumnDef::new(CourseOfferings::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CourseOfferings::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_offerings-course_id")
                            .from(CourseOfferings::Table, CourseOfferings::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_offerings-semester_id")
                            .from(CourseOfferings::Table, CourseOfferings::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_course_offerings_course_semester_section")
                    .table(CourseOfferings::Table)
                    .col(CourseOfferings::CourseId)
                    .col(CourseOfferings::SemesterId)
                    .col(CourseOfferings::Section)
                    .to_owned(),
            )
            .await?;

        // Create enrollments table (many-to-many between students and offerings)
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::OfferingId).uuid().not_null())
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string_len(16)
                            .not_null()
                            .default("enrolled")
                            .check(Expr::col(Enrollments::Status).is_in([
                                "enrolled",
                                "dropped",
                                "completed",
                                "withdrawn",
                            ])),
                    )
                    .col(ColumnDef::new(Enrollments::Grade).string())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-offering_id")
                            .from(Enrollments::Table, Enrollments::OfferingId)
                            .to(CourseOfferings::Table, CourseOfferings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_enrollments_student_offering")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::OfferingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseOfferings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Semesters::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CoursePrerequisites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseInstructors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Instructors::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}

#[derive(Iden)]
enum Instructors {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    DepartmentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Code,
    Title,
    Description,
    Credits,
    DepartmentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CourseInstructors {
    Table,
    CourseId,
    InstructorId,
    Role,
    CreatedAt,
}

#[derive(Iden)]
enum CoursePrerequisites {
    Table,
    CourseId,
    PrerequisiteCourseId,
    CreatedAt,
}

#[derive(Iden)]
enum Semesters {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CourseOfferings {
    Table,
    Id,
    CourseId,
    SemesterId,
    Section,
    Capacity,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    OfferingId,
    Status,
    Grade,
    EnrolledAt,
    UpdatedAt,
}
