use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Username, 100).unique_key())
                    .col(string_len(Users::PasswordHash, 100))
                    .col(string_len(Users::Email, 255).unique_key())
                    .col(string(Users::FirstName))
                    .col(string(Users::LastName))
                    .col(string(Users::PhoneNumber))
                    .col(string_len(Users::Role, 20))
                    .col(date_time(Users::CreatedAt))
                    .col(date_time_null(Users::LastLoginAt))
                    .col(boolean(Users::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        // Create farmers table (1:1 with users)
        manager
            .create_table(
                Table::create()
                    .table(Farmers::Table)
                    .if_not_exists()
                    .col(pk_auto(Farmers::Id))
                    .col(string_len(Farmers::FarmName, 100))
                    .col(string_len(Farmers::Location, 100))
                    .col(integer(Farmers::UserId).unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farmers_user")
                            .from(Farmers::Table, Farmers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string_len(Products::Name, 100))
                    .col(string_len(Products::Category, 100))
                    .col(date(Products::ProductionDate))
                    .col(string_len_null(Products::Description, 500))
                    .col(integer(Products::FarmerId))
                    .col(date_time(Products::CreatedAt))
                    .col(boolean(Products::IsActive).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_farmer")
                            .from(Products::Table, Products::FarmerId)
                            .to(Farmers::Table, Farmers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_farmer_id")
                    .table(Products::Table)
                    .col(Products::FarmerId)
                    .to_owned(),
            )
            .await?;

        // Create messages table; users referenced by messages cannot be deleted
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(pk_auto(Messages::Id))
                    .col(integer(Messages::SenderId))
                    .col(integer(Messages::RecipientId))
                    .col(string_len(Messages::Subject, 200))
                    .col(string_len(Messages::Content, 1000))
                    .col(date_time(Messages::SentAt))
                    .col(date_time_null(Messages::ReadAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_sender")
                            .from(Messages::Table, Messages::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_recipient")
                            .from(Messages::Table, Messages::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_recipient_id")
                    .table(Messages::Table)
                    .col(Messages::RecipientId)
                    .to_owned(),
            )
            .await?;

        // Create registration_requests table
        manager
            .create_table(
                Table::create()
                    .table(RegistrationRequests::Table)
                    .if_not_exists()
                    .col(pk_auto(RegistrationRequests::Id))
                    .col(string_len(RegistrationRequests::Username, 100))
                    .col(string_len(RegistrationRequests::PasswordHash, 100))
                    .col(string(RegistrationRequests::FirstName))
                    .col(string(RegistrationRequests::LastName))
                    .col(string_len(RegistrationRequests::Email, 255))
                    .col(string(RegistrationRequests::PhoneNumber))
                    .col(string_len(RegistrationRequests::FarmName, 100))
                    .col(string_len(RegistrationRequests::Location, 100))
                    .col(date_time(RegistrationRequests::RequestedAt))
                    .col(string_len(RegistrationRequests::Status, 20).default("Pending"))
                    .col(string_null(RegistrationRequests::RejectionReason))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registration_requests_status")
                    .table(RegistrationRequests::Table)
                    .col(RegistrationRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to respect foreign key constraints
        manager
            .drop_table(Table::drop().table(RegistrationRequests::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Farmers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    FirstName,
    LastName,
    PhoneNumber,
    Role,
    CreatedAt,
    LastLoginAt,
    IsActive,
}

#[derive(DeriveIden)]
enum Farmers {
    Table,
    Id,
    FarmName,
    Location,
    UserId,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Category,
    ProductionDate,
    Description,
    FarmerId,
    CreatedAt,
    IsActive,
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    SenderId,
    RecipientId,
    Subject,
    Content,
    SentAt,
    ReadAt,
}

#[derive(DeriveIden)]
enum RegistrationRequests {
    Table,
    Id,
    Username,
    PasswordHash,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    FarmName,
    Location,
    RequestedAt,
    Status,
    RejectionReason,
}
