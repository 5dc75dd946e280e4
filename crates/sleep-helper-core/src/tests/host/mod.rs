mod media_host;
