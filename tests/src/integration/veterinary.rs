//! # Veterinary Flows
//!
//! Center registration, official rosters and vaccination histories.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use dogbase_registry::prelude::*;

    async fn center(service: &TestService, registrar: Address) -> VetCenterId {
        service
            .register_vet_center(ctx(registrar), vet_center("Clinica Costa"))
            .await
            .unwrap()
            .output
            .vet_center_id()
            .unwrap()
    }

    #[tokio::test]
    async fn test_center_ids_are_sequential() {
        let service = service();

        let first = center(&service, carol()).await;
        let second = center(&service, bob()).await;

        assert_eq!(first, VetCenterId(0));
        assert_eq!(second, VetCenterId(1));
        assert_eq!(service.vet_center_count().await.unwrap(), 2);
        assert_eq!(
            service.vet_center(first).await.unwrap().unwrap().registrar,
            carol()
        );
    }

    #[tokio::test]
    async fn test_official_records_vaccines() {
        let service = service();
        register_max(&service).await;
        let clinic = center(&service, carol()).await;
        service
            .register_vet_official(ctx(carol()), clinic, OfficialSlot(0), bob())
            .await
            .unwrap();

        service
            .add_vaccine_record(ctx(bob()), max_chip(), vaccine("Rabies"), clinic)
            .await
            .unwrap();
        service
            .add_vaccine_record(ctx(bob()), max_chip(), vaccine("Parvovirus"), clinic)
            .await
            .unwrap();

        let history = service.vaccines(max_chip()).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].vaccine.name, "Rabies");
        assert_eq!(history[1].vaccine.name, "Parvovirus");
        assert!(history.iter().all(|r| r.administered_by == bob()));
        assert!(history.iter().all(|r| r.vet_center_id == clinic));
    }

    #[tokio::test]
    async fn test_non_official_cannot_record() {
        let service = service();
        register_max(&service).await;
        let clinic = center(&service, carol()).await;

        let err = service
            .add_vaccine_record(ctx(alice()), max_chip(), vaccine("Rabies"), clinic)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(service.vaccines(max_chip()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_staffs_any_center() {
        let service = service();
        let clinic = center(&service, carol()).await;

        service
            .register_vet_official(ctx(admin()), clinic, OfficialSlot(3), bob())
            .await
            .unwrap();

        assert_eq!(
            service.vet_official(clinic, OfficialSlot(3)).await.unwrap(),
            Some(bob())
        );
        assert!(service.is_vet_official(bob(), clinic).await.unwrap());
    }

    #[tokio::test]
    async fn test_replacing_slot_revokes_previous_official() {
        let service = service();
        register_max(&service).await;
        let clinic = center(&service, carol()).await;
        service
            .register_vet_official(ctx(carol()), clinic, OfficialSlot(0), bob())
            .await
            .unwrap();

        service
            .register_vet_official(ctx(carol()), clinic, OfficialSlot(0), alice())
            .await
            .unwrap();

        assert!(!service.is_vet_official(bob(), clinic).await.unwrap());
        let err = service
            .add_vaccine_record(ctx(bob()), max_chip(), vaccine("Rabies"), clinic)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_official_scope_is_per_center() {
        let service = service();
        register_max(&service).await;
        let north = center(&service, carol()).await;
        let south = center(&service, carol()).await;
        service
            .register_vet_official(ctx(carol()), north, OfficialSlot(0), bob())
            .await
            .unwrap();

        let err = service
            .add_vaccine_record(ctx(bob()), max_chip(), vaccine("Rabies"), south)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_record_for_unknown_token_or_center() {
        let service = service();
        let clinic = center(&service, carol()).await;
        service
            .register_vet_official(ctx(carol()), clinic, OfficialSlot(0), bob())
            .await
            .unwrap();

        let err = service
            .add_vaccine_record(ctx(bob()), max_chip(), vaccine("Rabies"), clinic)
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::NotFound(EntityRef::Token(max_chip())));

        let err = service
            .add_vaccine_record(ctx(bob()), max_chip(), vaccine("Rabies"), VetCenterId(9))
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::NotFound(EntityRef::VetCenter(VetCenterId(9))));
    }
}
