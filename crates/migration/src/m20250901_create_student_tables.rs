use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::Code)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Departments::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Students::RegistrationNumber)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Phone).string_len(32))
                    .col(ColumnDef::new(Students::DateOfBirth).date())
                    .col(
                        ColumnDef::new(Students::Status)
                            .string_len(16)
                            .not_null()
                            .default("active")
                            .check(Expr::col(Students::Status).is_in([
                                "active",
                                "suspended",
                                "graduated",
                                "withdrawn",
                            ])),
                    )
                    .col(ColumnDef::new(Students::EnrolledDate).date().not_null())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create student_profiles table (one-to-one with students)
        manager
            .create_table(
                Table::create()
                    .table(StudentProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentProfiles::StudentId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StudentProfiles::Gender).string_len(32))
                    .col(ColumnDef::new(StudentProfiles::Nationality).string())
                    .col(ColumnDef::new(StudentProfiles::Bio).text())
                    .col(ColumnDef::new(StudentProfiles::EmergencyContactName).string())
                    .col(ColumnDef::new(StudentProfiles::EmergencyContactPhone).string_len(32))
                    .col(
                        ColumnDef::new(StudentProfiles::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(StudentProfiles::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_profiles-student_id")
                            .from(StudentProfiles::Table, StudentProfiles::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create addresses table
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Addresses::Label).string_len(32).not_null())
                    .col(ColumnDef::new(Addresses::Line1).string().not_null())
                    .col(ColumnDef::new(Addresses::Line2).string())
                    .col(ColumnDef::new(Addresses::City).string().not_null())
                    .col(ColumnDef::new(Addresses::State).string())
                    .col(ColumnDef::new(Addresses::PostalCode).string_len(16))
                    .col(ColumnDef::new(Addresses::Country).string().not_null())
                    .col(
                        ColumnDef::new(Addresses::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Addresses::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Addresses::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-addresses-student_id")
                            .from(Addresses::Table, Addresses::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudentProfiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    Name,
    Code,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    RegistrationNumber,
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    Status,
    EnrolledDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StudentProfiles {
    Table,
    Id,
    StudentId,
    Gender,
    Nationality,
    Bio,
    EmergencyContactName,
    EmergencyContactPhone,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
    StudentId,
    Label,
    Line1,
    Line2,
    City,
    State,
    PostalCode,
    Country,
    IsPrimary,
    CreatedAt,
    UpdatedAt,
}
