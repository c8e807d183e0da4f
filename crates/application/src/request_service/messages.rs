use super::*;

impl RequestService {
    /// Appends a free-text message to a request and returns the new entry.
    ///
    /// The entry carries an empty field map. Anyone who may view the request
    /// may comment on it.
    pub async fn add_message(
        &self,
        actor: &UserIdentity,
        request_id: RequestId,
        comment: String,
    ) -> AppResult<AuditEntry> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let stored = self.find_required(request_id).await?;
            request_access::require_view(actor, &stored.request)?;

            let mut request = stored.request;
            let entry = request.append_comment(actor.clone(), comment.clone(), Utc::now());

            match self.repository.update(request, stored.version).await {
                Ok(_) => return Ok(entry),
                Err(AppError::Conflict(_)) if attempt < CONFLICT_RETRY_ATTEMPTS => {}
                Err(error) => return Err(error),
            }
        }
    }

    /// Returns the full audit trail of a request, oldest first.
    pub async fn list_updates(
        &self,
        actor: &UserIdentity,
        request_id: RequestId,
    ) -> AppResult<Vec<AuditEntry>> {
        let stored = self.find_required(request_id).await?;
        request_access::require_view(actor, &stored.request)?;
        Ok(stored.request.updates().to_vec())
    }
}
