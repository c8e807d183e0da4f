use super::*;

impl RequestService {
    /// Applies a reviewer status transition. Manager only.
    ///
    /// Entering `Approved` triggers the provisioning pipeline after the
    /// status change and its audit entry are committed; the trigger outcome
    /// is then recorded as a separate system-authored entry, so a failed
    /// trigger never rolls back or loses the status change. A trigger
    /// failure still surfaces as `Pipeline` once the notice is persisted.
    pub async fn transition_status(
        &self,
        actor: &UserIdentity,
        request_id: RequestId,
        next: RequestStatus,
        comment: Option<String>,
    ) -> AppResult<AccessRequest> {
        request_access::require_manage(actor)?;

        let mut attempt = 0;
        let saved = loop {
            attempt += 1;
            let stored = self.find_required(request_id).await?;

            let mut request = stored.request;
            request.apply_transition(next, actor.clone(), comment.clone(), Utc::now())?;

            match self.repository.update(request, stored.version).await {
                Ok(saved) => break saved,
                Err(AppError::Conflict(_)) if attempt < CONFLICT_RETRY_ATTEMPTS => {}
                Err(error) => return Err(error),
            }
        };

        if next != RequestStatus::Approved {
            return Ok(saved.request);
        }

        let outcome = self
            .pipeline
            .trigger(ProvisioningJob::from_request(&saved.request))
            .await;

        let notice = match &outcome {
            Ok(reference) => {
                format!("Data provisioning pipeline triggered. See the run here: {reference}")
            }
            Err(error) => format!("Failed to trigger data provisioning pipeline: {error}"),
        };

        let updated = self.append_system_notice(request_id, saved, notice).await?;

        match outcome {
            Ok(_) => Ok(updated),
            Err(error) => Err(error),
        }
    }

    /// Persists one system-authored notice entry on top of an already
    /// committed document, re-reading on a lost race.
    async fn append_system_notice(
        &self,
        request_id: RequestId,
        stored: VersionedRequest,
        notice: String,
    ) -> AppResult<AccessRequest> {
        let VersionedRequest {
            mut request,
            mut version,
        } = stored;

        let mut attempt = 0;
        loop {
            attempt += 1;
            request.append_comment(UserIdentity::system(), notice.clone(), Utc::now());

            match self.repository.update(request, version).await {
                Ok(saved) => return Ok(saved.request),
                Err(AppError::Conflict(_)) if attempt < CONFLICT_RETRY_ATTEMPTS => {
                    let fresh = self.find_required(request_id).await?;
                    request = fresh.request;
                    version = fresh.version;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
