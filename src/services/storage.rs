// src/services/storage.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::common::error::AppError;

/// Persistência de arquivos atrás de um trait, para permitir trocar o
/// disco local por um object storage sem tocar nos serviços.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, bytes: &[u8], key: &str) -> Result<String, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
    async fn rename(&self, old_key: &str, new_key: &str) -> Result<(), AppError>;
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;
}

/// Valida uma chave vinda (parcialmente) do usuário: segmentos
/// relativos simples, sem `..`, sem raiz, sem backslash.
pub fn sanitize_key(key: &str) -> Result<&str, AppError> {
    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(anyhow::anyhow!("chave de arquivo inválida: {}", key).into());
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(anyhow::anyhow!("chave de arquivo inválida: {}", key).into());
        }
    }
    Ok(key)
}

/// Implementação em disco local, enraizada em STORAGE_ROOT.
#[derive(Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, AppError> {
        Ok(self.root.join(sanitize_key(key)?))
    }

    async fn ensure_parent(path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("falha ao criar diretório: {}", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    // Escrita é last-write-wins: uploads concorrentes para a mesma
    // chave (ex.: logo da empresa) simplesmente se sobrescrevem.
    async fn upload(&self, bytes: &[u8], key: &str) -> Result<String, AppError> {
        let path = self.resolve(key)?;
        Self::ensure_parent(&path).await?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| anyhow::anyhow!("falha ao gravar arquivo {}: {}", key, e))?;
        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::anyhow!("falha ao remover arquivo {}: {}", key, e).into()),
        }
    }

    async fn rename(&self, old_key: &str, new_key: &str) -> Result<(), AppError> {
        let old_path = self.resolve(old_key)?;
        let new_path = self.resolve(new_key)?;
        Self::ensure_parent(&new_path).await?;
        tokio::fs::rename(&old_path, &new_path)
            .await
            .map_err(|e| anyhow::anyhow!("falha ao renomear {}: {}", old_key, e))?;
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!("falha ao ler arquivo {}: {}", key, e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn sanitize_accepts_simple_relative_keys() {
        assert!(sanitize_key("logos/empresa.png").is_ok());
        assert!(sanitize_key("produtos/abc-123/imagem.jpg").is_ok());
    }

    #[test]
    fn sanitize_rejects_traversal_and_absolute_paths() {
        assert!(sanitize_key("").is_err());
        assert!(sanitize_key("/etc/passwd").is_err());
        assert!(sanitize_key("../segredo.txt").is_err());
        assert!(sanitize_key("logos/../../segredo.txt").is_err());
        assert!(sanitize_key("logos\\empresa.png").is_err());
        assert!(sanitize_key("logos//empresa.png").is_err());
    }

    #[tokio::test]
    async fn local_store_roundtrip() {
        let root = std::env::temp_dir().join(format!("distribuidora-test-{}", Uuid::new_v4()));
        let store = LocalFileStore::new(&root);

        let key = store.upload(b"conteudo", "logos/a.png").await.unwrap();
        assert_eq!(key, "logos/a.png");
        assert_eq!(store.read("logos/a.png").await.unwrap(), Some(b"conteudo".to_vec()));

        store.rename("logos/a.png", "logos/b.png").await.unwrap();
        assert_eq!(store.read("logos/a.png").await.unwrap(), None);
        assert_eq!(store.read("logos/b.png").await.unwrap(), Some(b"conteudo".to_vec()));

        store.delete("logos/b.png").await.unwrap();
        assert_eq!(store.read("logos/b.png").await.unwrap(), None);

        // deletar chave inexistente é idempotente
        store.delete("logos/b.png").await.unwrap();

        tokio::fs::remove_dir_all(&root).await.ok();
    }

    #[tokio::test]
    async fn upload_overwrites_same_key() {
        let root = std::env::temp_dir().join(format!("distribuidora-test-{}", Uuid::new_v4()));
        let store = LocalFileStore::new(&root);

        store.upload(b"primeiro", "logos/logo.png").await.unwrap();
        store.upload(b"segundo", "logos/logo.png").await.unwrap();
        assert_eq!(
            store.read("logos/logo.png").await.unwrap(),
            Some(b"segundo".to_vec())
        );

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
