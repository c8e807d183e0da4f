use super::*;

impl RequestService {
    /// Applies a requestor edit to a request's details.
    ///
    /// Records the field-level diff and resubmits the request for review:
    /// status always resets to `Pending`, whatever the prior state. Only the
    /// original requestor may edit.
    pub async fn edit_request(
        &self,
        actor: &UserIdentity,
        request_id: RequestId,
        details: RequestDetails,
    ) -> AppResult<AccessRequest> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let stored = self.find_required(request_id).await?;
            request_access::require_edit(actor, &stored.request)?;

            let mut request = stored.request;
            request.apply_details(&details, actor.clone(), None, Utc::now());
            request.resubmit();

            match self.repository.update(request, stored.version).await {
                Ok(saved) => return Ok(saved.request),
                Err(AppError::Conflict(_)) if attempt < CONFLICT_RETRY_ATTEMPTS => {}
                Err(error) => return Err(error),
            }
        }
    }
}
