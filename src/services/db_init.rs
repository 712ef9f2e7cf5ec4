use mongodb::{
    bson::doc,
    options::IndexOptions,
    Database, IndexModel,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // notifications: query by user quickly and sort by created_at desc
    {
        let col = db.collection::<mongodb::bson::Document>("notifications");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // price_alerts: helpful for the sweep scan (eligibility + coin)
    {
        let col = db.collection::<mongodb::bson::Document>("price_alerts");
        let model = IndexModel::builder()
            .keys(doc! { "is_active": 1, "coin_id": 1 })
            .build();

        let _ = col.create_index(model, None).await;
    }

    // user_settings: one record per user
    {
        let col = db.collection::<mongodb::bson::Document>("user_settings");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}
