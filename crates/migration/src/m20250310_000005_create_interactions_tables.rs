use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250310_000001_create_users_table::Users,
    m20250310_000004_create_catalog_tables::Recipes,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecipeBookmarks::Table)
                    .if_not_exists()
                    .col(pk_auto(RecipeBookmarks::Id))
                    .col(integer(RecipeBookmarks::RecipeId))
                    .col(uuid(RecipeBookmarks::UserId))
                    .col(
                        timestamp_with_time_zone(RecipeBookmarks::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_bookmarks_recipe")
                            .from(RecipeBookmarks::Table, RecipeBookmarks::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_bookmarks_user")
                            .from(RecipeBookmarks::Table, RecipeBookmarks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One bookmark per (recipe, user)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_recipe_bookmarks_recipe_user")
                    .table(RecipeBookmarks::Table)
                    .col(RecipeBookmarks::RecipeId)
                    .col(RecipeBookmarks::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeComments::Table)
                    .if_not_exists()
                    .col(pk_auto(RecipeComments::Id))
                    .col(integer(RecipeComments::RecipeId))
                    .col(uuid_null(RecipeComments::AuthorId))
                    .col(text(RecipeComments::Text))
                    .col(
                        timestamp_with_time_zone(RecipeComments::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_comments_recipe")
                            .from(RecipeComments::Table, RecipeComments::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_comments_author")
                            .from(RecipeComments::Table, RecipeComments::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_recipe_comments_recipe")
                    .table(RecipeComments::Table)
                    .col(RecipeComments::RecipeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeBookmarks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RecipeBookmarks {
    Table,
    Id,
    RecipeId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum RecipeComments {
    Table,
    Id,
    RecipeId,
    AuthorId,
    Text,
    CreatedAt,
}
