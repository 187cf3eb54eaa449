use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string_len(Categories::Name, 32).unique_key())
                    .col(string(Categories::Slug).unique_key())
                    .col(string_null(Categories::ImageUrl))
                    .col(
                        timestamp_with_time_zone(Categories::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(pk_auto(Recipes::Id))
                    .col(string(Recipes::Name))
                    .col(string(Recipes::Slug).unique_key())
                    .col(text(Recipes::Description))
                    .col(text(Recipes::CookingDescription))
                    .col(string_null(Recipes::ImageUrl))
                    .col(integer(Recipes::CategoryId))
                    .col(big_integer(Recipes::Views).default(0))
                    .col(
                        timestamp_with_time_zone(Recipes::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_category")
                            .from(Recipes::Table, Recipes::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_recipes_category")
                    .table(Recipes::Table)
                    .col(Recipes::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(pk_auto(Ingredients::Id))
                    .col(string(Ingredients::Name))
                    .col(integer(Ingredients::RecipeId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingredients_recipe")
                            .from(Ingredients::Table, Ingredients::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ingredients_recipe")
                    .table(Ingredients::Table)
                    .col(Ingredients::RecipeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Categories {
    Table,
    Id,
    Name,
    Slug,
    ImageUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Recipes {
    Table,
    Id,
    Name,
    Slug,
    Description,
    CookingDescription,
    ImageUrl,
    CategoryId,
    Views,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Ingredients {
    Table,
    Id,
    Name,
    RecipeId,
}
