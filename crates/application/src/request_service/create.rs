use super::*;

impl RequestService {
    /// Creates a new request owned by the actor.
    ///
    /// The document starts in `Pending` with an empty audit trail; the
    /// submitted details become the initial field values.
    pub async fn create_request(
        &self,
        actor: &UserIdentity,
        details: RequestDetails,
        request_data: BTreeMap<String, String>,
    ) -> AppResult<AccessRequest> {
        let request = AccessRequest::new(
            RequestId::new(),
            actor.clone(),
            details,
            request_data,
            Utc::now(),
        );

        let stored = self.repository.create(request).await?;
        Ok(stored.request)
    }
}
